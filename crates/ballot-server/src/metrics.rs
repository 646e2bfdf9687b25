// Domain counters for the maker-checker workflow and the election rules
// The Prometheus recorder is installed by main; tests run against the no-op recorder.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const PENDING_ACTIONS_CREATED: &str = "ballot_pending_actions_created_total";
pub const PENDING_ACTIONS_DECIDED: &str = "ballot_pending_actions_decided_total";
pub const DIRECT_MUTATIONS: &str = "ballot_direct_mutations_total";
pub const NOMINATIONS: &str = "ballot_nominations_total";
pub const VOTES_RECORDED: &str = "ballot_votes_recorded_total";

/// Install the global Prometheus recorder; the handle renders `/metrics`.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Initialize all metric descriptions
/// Should be called once at application startup, after the recorder is installed
pub fn init_metrics() {
    describe_counter!(
        PENDING_ACTIONS_CREATED,
        "Writes queued for SuperAdmin approval"
    );
    describe_counter!(
        PENDING_ACTIONS_DECIDED,
        "Pending actions approved or rejected"
    );
    describe_counter!(
        DIRECT_MUTATIONS,
        "Writes applied immediately by a SuperAdmin"
    );
    describe_counter!(NOMINATIONS, "Nominations granted or removed");
    describe_counter!(VOTES_RECORDED, "Vote submissions");

    tracing::info!("Metrics initialized");
}

pub fn record_pending_action_created(entity_type: &str) {
    counter!(PENDING_ACTIONS_CREATED, "entity_type" => entity_type.to_string()).increment(1);
}

pub fn record_pending_action_decided(status: &str) {
    counter!(PENDING_ACTIONS_DECIDED, "status" => status.to_string()).increment(1);
}

pub fn record_direct_mutation(entity_type: &str, action: &str) {
    counter!(
        DIRECT_MUTATIONS,
        "entity_type" => entity_type.to_string(),
        "action" => action.to_string()
    )
    .increment(1);
}

pub fn record_nomination(action: &str) {
    counter!(NOMINATIONS, "action" => action.to_string()).increment(1);
}

pub fn record_votes(created: bool) {
    let outcome = if created { "created" } else { "updated" };
    counter!(VOTES_RECORDED, "outcome" => outcome).increment(1);
}
