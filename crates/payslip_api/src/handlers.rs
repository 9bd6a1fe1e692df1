//! HTTP request handlers
//!
//! Handler stages of the declared routes. Salary slip stages each compute
//! one part of the slip and store it in the request locals; the last stage
//! sends the accumulated slip.
//!
//! # Architecture
//!
//! Each stage:
//! 1. Reads the validated request body and earlier results
//! 2. Calls the calculations in `payslip_core`
//! 3. Stores its result in `ctx.locals`, or responds

use anyhow::Context;
use axum::{response::IntoResponse, Json};
use payslip_core::{calculation, CalculationError, SalaryDetails, SalarySlip, TaxTable};
use serde_json::{json, Value};

use crate::{
    context::RequestContext,
    errors::{ApiError, HandlerError},
    middleware::Next,
    models::{HealthCheckResponse, SalarySlipResponse},
};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Reject input the calculations cannot handle.
#[track_caller]
fn calculation_error(error: CalculationError) -> ApiError {
    ApiError::invalid_input().with_details(json!({ "message": error.to_string() }))
}

/// Name, pay period and monthly gross income.
pub fn start_salary_slip(ctx: &mut RequestContext) -> Result<Next, HandlerError> {
    let details: SalaryDetails = ctx.body_as()?;

    ctx.set_local("Name", details.full_name());
    ctx.set_local("payPeriod", details.pay_start_date);
    ctx.set_local("grossIncome", calculation::gross_income(details.annual_salary));

    Ok(Next::Continue)
}

/// Monthly superannuation from the gross income.
pub fn add_super_income(ctx: &mut RequestContext) -> Result<Next, HandlerError> {
    let super_rate: f64 = ctx.body_field("super_rate")?;
    let gross_income = ctx.local_i64("grossIncome")?;

    ctx.set_local(
        "superIncome",
        calculation::super_income(gross_income, super_rate),
    );

    Ok(Next::Continue)
}

/// Monthly income tax from the annual salary's slab.
pub fn add_tax_amount(ctx: &mut RequestContext, table: &TaxTable) -> Result<Next, HandlerError> {
    let annual_salary: f64 = ctx.body_field("annual_salary")?;
    let slab = calculation::tax_slab(annual_salary).map_err(|e| calculation_error(e))?;

    tracing::debug!(%slab, "Selected tax slab");
    ctx.set_local(
        "taxAmount",
        calculation::income_tax(annual_salary, table.bracket(slab)),
    );

    Ok(Next::Continue)
}

/// Monthly net income: gross income minus tax.
pub fn add_net_income(ctx: &mut RequestContext) -> Result<Next, HandlerError> {
    let gross_income = ctx.local_i64("grossIncome")?;
    let tax_amount = ctx.local_i64("taxAmount")?;

    ctx.set_local(
        "netIncome",
        calculation::net_income(gross_income, tax_amount),
    );

    Ok(Next::Continue)
}

/// Send the accumulated slip as `{ salarySlip: {...} }`.
pub fn send_salary_slip(ctx: &mut RequestContext) -> Result<Next, HandlerError> {
    let salary_slip: SalarySlip = serde_json::from_value(Value::Object(ctx.locals.clone()))
        .context("Salary slip is incomplete")?;

    Ok(Next::Respond(
        Json(SalarySlipResponse { salary_slip }).into_response(),
    ))
}

/// GET /health
pub fn health_check(_ctx: &mut RequestContext) -> Result<Next, HandlerError> {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    Ok(Next::Respond(Json(response).into_response()))
}
