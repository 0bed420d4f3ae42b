//! End of a hunt: record the capture and summarize the run.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, info, span_fn, span_scope};

use crate::app_state::AppState;
use crate::events::PursuerCaptured;
use crate::resources::{CaptureLatch, SimulationTick, SurvivalClock, format_mm_ss};

pub struct GameOverPlugin;

impl Plugin for GameOverPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_pursuer_captured);
        app.add_systems(OnEnter(AppState::GameOver), log_summary);
    }
}

fn on_pursuer_captured(trigger: On<PursuerCaptured>) {
    let event = trigger.event();
    imetric!("captures", "count", 1);
    imetric!("ticks_survived", "ticks", event.tick);
}

/// Summary lines for the end of a hunt.
pub fn summary_lines(
    latch: &CaptureLatch,
    tick: &SimulationTick,
    clock: &SurvivalClock,
) -> Vec<String> {
    let mut lines = Vec::new();
    match latch.report() {
        Some(report) => {
            lines.push(format!("Caught by: {}", report.name));
            lines.push(format!("Survived: {}", format_mm_ss(report.survived)));
            lines.push(format!("Ticks: {}", report.tick));
        }
        None => {
            lines.push("Escaped".to_string());
            lines.push(format!("Survived: {}", clock.display()));
            lines.push(format!("Ticks: {}", tick.0));
        }
    }
    lines
}

#[span_fn]
fn log_summary(
    latch: Option<Res<CaptureLatch>>,
    tick: Option<Res<SimulationTick>>,
    clock: Option<Res<SurvivalClock>>,
) {
    let (Some(latch), Some(tick), Some(clock)) = (latch, tick, clock) else {
        return;
    };
    for line in summary_lines(&latch, &tick, &clock) {
        info!("{line}");
    }
}
