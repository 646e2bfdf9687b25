//! Initial schema: administrative hierarchy, workflow and election tables.

use ballot_persistence::entity::{
    administrative_unit, audit_trail, candidate, candidate_participation, fee, fee_history,
    payment, pending_action, registrar, users, vote,
};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_table<E>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

async fn create_index(
    manager: &SchemaManager<'_>,
    name: &str,
    table: impl IntoTableRef,
    columns: Vec<DynIden>,
) -> Result<(), DbErr> {
    let mut index = Index::create();
    index.name(name).table(table).if_not_exists();
    for column in columns {
        index.col(column);
    }

    manager.create_index(index.to_owned()).await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Hierarchy and accounts
        create_table(manager, &schema, users::Entity).await?;
        create_table(manager, &schema, administrative_unit::Entity).await?;
        create_table(manager, &schema, registrar::Entity).await?;

        // Maker-checker workflow
        create_table(manager, &schema, pending_action::Entity).await?;
        create_table(manager, &schema, audit_trail::Entity).await?;

        // Candidates, fees, payments and votes
        create_table(manager, &schema, candidate::Entity).await?;
        create_table(manager, &schema, candidate_participation::Entity).await?;
        create_table(manager, &schema, fee::Entity).await?;
        create_table(manager, &schema, fee_history::Entity).await?;
        create_table(manager, &schema, payment::Entity).await?;
        create_table(manager, &schema, vote::Entity).await?;

        create_index(
            manager,
            "idx_administrative_unit_level_parent",
            administrative_unit::Entity,
            vec![
                administrative_unit::Column::Level.into_iden(),
                administrative_unit::Column::ParentId.into_iden(),
            ],
        )
        .await?;
        create_index(
            manager,
            "idx_registrar_unit",
            registrar::Entity,
            vec![registrar::Column::AdministrativeUnitId.into_iden()],
        )
        .await?;
        create_index(
            manager,
            "idx_pending_action_status",
            pending_action::Entity,
            vec![
                pending_action::Column::Status.into_iden(),
                pending_action::Column::EntityType.into_iden(),
            ],
        )
        .await?;
        create_index(
            manager,
            "idx_audit_trail_entity",
            audit_trail::Entity,
            vec![
                audit_trail::Column::EntityType.into_iden(),
                audit_trail::Column::EntityId.into_iden(),
            ],
        )
        .await?;
        create_index(
            manager,
            "idx_participation_path",
            candidate_participation::Entity,
            vec![
                candidate_participation::Column::PositionPath.into_iden(),
                candidate_participation::Column::Year.into_iden(),
            ],
        )
        .await?;
        create_index(
            manager,
            "idx_payment_candidate_path",
            payment::Entity,
            vec![
                payment::Column::CandidateId.into_iden(),
                payment::Column::PositionPath.into_iden(),
            ],
        )
        .await?;
        create_index(
            manager,
            "idx_vote_participation",
            vote::Entity,
            vec![vote::Column::CandidateParticipationId.into_iden()],
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            vote::Entity.into_table_ref(),
            payment::Entity.into_table_ref(),
            fee_history::Entity.into_table_ref(),
            fee::Entity.into_table_ref(),
            candidate_participation::Entity.into_table_ref(),
            candidate::Entity.into_table_ref(),
            audit_trail::Entity.into_table_ref(),
            pending_action::Entity.into_table_ref(),
            registrar::Entity.into_table_ref(),
            administrative_unit::Entity.into_table_ref(),
            users::Entity.into_table_ref(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}
