//! Blind command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use homepilot_core::{
    BlindAdapter, Characteristic, CharacteristicValue, CoreError, Position, PositionState,
};

use crate::cli::{GetArgs, GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

use super::Session;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BlindSummary {
    did: String,
    uuid: String,
    name: String,
    model: String,
    position: Position,
    state: PositionState,
    obstructed: bool,
}

#[derive(Tabled)]
struct BlindRow {
    #[tabled(rename = "DID")]
    did: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Obstructed")]
    obstructed: String,
}

impl From<&BlindSummary> for BlindRow {
    fn from(b: &BlindSummary) -> Self {
        Self {
            did: b.did.clone(),
            name: b.name.clone(),
            model: b.model.clone(),
            position: format!("{}%", b.position),
            state: b.state.to_string(),
            obstructed: if b.obstructed { "yes" } else { "no" }.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Reading {
    did: String,
    name: String,
    #[serde(flatten)]
    value: CharacteristicValue,
}

fn summarize(session: &Session, adapter: &BlindAdapter) -> BlindSummary {
    let state = adapter.state();
    let obstructed = session
        .host
        .accessory(adapter.uuid())
        .and_then(|a| a.value(Characteristic::ObstructionDetected))
        .is_some_and(|v| v == CharacteristicValue::ObstructionDetected(true));

    BlindSummary {
        did: adapter.did().to_owned(),
        uuid: adapter.uuid().to_string(),
        name: adapter.display_name(),
        model: adapter.context().model.clone(),
        position: state.last_position,
        state: state.position_state,
        obstructed,
    }
}

fn reading_detail(r: &Reading) -> String {
    [
        format!("Blind:          {} [{}]", r.name, r.did),
        format!("{:<15} {}", format!("{}:", r.value.characteristic()), r.value),
    ]
    .join("\n")
}

fn find(session: &Session, did: &str) -> Result<Arc<BlindAdapter>, CliError> {
    session
        .registry
        .adapter_by_did(did)
        .ok_or_else(|| {
            CoreError::AccessoryNotFound {
                identifier: did.to_owned(),
            }
            .into()
        })
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let blinds: Vec<BlindSummary> = session
        .registry
        .adapters()
        .iter()
        .map(|a| summarize(session, a))
        .collect();

    let out = output::render_list(
        global.output,
        &blinds,
        |b| BlindRow::from(b),
        |b| b.did.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn get(session: &Session, args: GetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let adapter = find(session, &args.did)?;
    let value = adapter.read(args.characteristic).await?;

    let reading = Reading {
        did: adapter.did().to_owned(),
        name: adapter.display_name(),
        value,
    };
    let out = output::render_single(global.output, &reading, reading_detail, |r| {
        r.value.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn set(session: &Session, args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = u8::try_from(args.position)
        .ok()
        .and_then(Position::new)
        .ok_or(CoreError::InvalidPosition {
            value: args.position,
        })?;

    let adapter = find(session, &args.did)?;
    let value = adapter
        .write(CharacteristicValue::TargetPosition(target))
        .await?;

    let reading = Reading {
        did: adapter.did().to_owned(),
        name: adapter.display_name(),
        value,
    };
    let out = output::render_single(global.output, &reading, reading_detail, |r| {
        r.value.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
