#![allow(dead_code)]

use weather_tank_core::solver::project;
use weather_tank_core::{
    Coefficients, FieldStore, FieldTotals, GroundBoundary, MomentumCell, ScalarCell, Stage,
    STEP_SEQUENCE,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run the full tick sequence directly on a store
pub fn run_tick(store: &mut FieldStore, ground: &GroundBoundary, coefficients: &Coefficients) {
    for stage in STEP_SEQUENCE {
        match stage {
            Stage::Dispatch(kernel) => store.dispatch(kernel, ground, coefficients),
            Stage::Project => project(store, ground, coefficients),
        }
    }
}

pub fn totals(store: &FieldStore) -> FieldTotals {
    FieldTotals::measure(store.momentum(), store.scalar())
}

pub fn momentum_bits(cells: &[MomentumCell]) -> Vec<[u32; 4]> {
    cells
        .iter()
        .map(|c| {
            [
                c.vx.to_bits(),
                c.vy.to_bits(),
                c.divergence.to_bits(),
                c.pressure.to_bits(),
            ]
        })
        .collect()
}

pub fn scalar_bits(cells: &[ScalarCell]) -> Vec<[u32; 4]> {
    cells
        .iter()
        .map(|c| {
            [
                c.temperature.to_bits(),
                c.rain.to_bits(),
                c.humidity.to_bits(),
                c.mist.to_bits(),
            ]
        })
        .collect()
}
