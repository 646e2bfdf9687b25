use actix_web::{Scope, web};

use ballot_common::BallotError;
use ballot_persistence::AdminLevel;

use crate::error::AppError;

/// Every API route under the configured context path.
pub fn routes(context_path: &str) -> Scope {
    let mut scope = web::scope(context_path)
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(auth_routes())
        .service(user_routes())
        .service(position_routes())
        .service(electoral_position_routes())
        .service(pending_action_routes())
        .service(audit_routes())
        .service(fee_routes())
        .service(payment_routes())
        .service(nomination_routes())
        .service(vote_routes());

    for level in AdminLevel::ALL {
        scope = scope.service(admin_unit_routes(level));
    }

    scope
}

/// One scope per administrative level, with nested registrars.
pub fn admin_unit_routes(level: AdminLevel) -> Scope {
    web::scope(&format!("/{}", level.resource()))
        .app_data(web::Data::new(level))
        .service(super::admin_unit::search_page)
        .service(super::admin_unit::create)
        .service(super::admin_unit::get)
        .service(super::admin_unit::update)
        .service(super::admin_unit::delete)
        .service(super::admin_unit::approve)
        .service(super::registrar::list)
        .service(super::registrar::get)
        .service(super::registrar::create)
        .service(super::registrar::update)
        .service(super::registrar::delete)
}

pub fn auth_routes() -> Scope {
    web::scope("/auth")
        .service(super::auth::login)
        .service(super::auth::me)
}

pub fn user_routes() -> Scope {
    web::scope("/users")
        .service(super::user::search_page)
        .service(super::user::create)
}

pub fn position_routes() -> Scope {
    web::scope("/positions")
        .service(super::position::catalog)
        .service(super::position::options)
        .service(super::position::resolve)
}

pub fn electoral_position_routes() -> Scope {
    web::scope("/electoral-positions")
        .service(super::electoral_position::search_page)
        .service(super::electoral_position::create)
        .service(super::electoral_position::get)
        .service(super::electoral_position::update)
        .service(super::electoral_position::delete)
}

pub fn pending_action_routes() -> Scope {
    web::scope("/pending-actions")
        .service(super::pending_action::search_page)
        .service(super::pending_action::get)
        .service(super::pending_action::decide)
}

pub fn audit_routes() -> Scope {
    web::scope("/audit-trail").service(super::audit::search_page)
}

pub fn fee_routes() -> Scope {
    web::scope("/fees")
        .service(super::fee::search)
        .service(super::fee::create)
        .service(super::fee::update)
        .service(super::fee::history)
}

pub fn payment_routes() -> Scope {
    web::scope("/payments")
        .service(super::payment::search)
        .service(super::payment::create)
        .service(super::payment::get)
        .service(super::payment::update_status)
}

pub fn nomination_routes() -> Scope {
    web::scope("/nominations")
        .service(super::nomination::candidates)
        .service(super::nomination::nominate)
        .service(super::nomination::remove)
}

pub fn vote_routes() -> Scope {
    web::scope("/votes")
        .service(super::vote::record)
        .service(super::vote::summary)
        .service(super::vote::for_candidate)
}

// Malformed bodies, query strings and path ids answer with the usual validation error body.

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::from(BallotError::validation(err.to_string())).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::from(BallotError::validation(err.to_string())).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::from(BallotError::validation(err.to_string())).into())
}
