#![allow(dead_code)]

use rusty_archery::model::{Arrow, ArrowValue, RoundConfig};
use rusty_archery::mvu::session::SessionModel;

pub fn value(s: &str) -> ArrowValue {
    s.parse().expect("test arrow value")
}

pub fn arrows(values: &[&str]) -> Vec<Arrow> {
    values.iter().map(|v| Arrow::scored(value(v))).collect()
}

pub fn session(round_name: &str, total_arrows: usize, arrows_per_end: usize) -> SessionModel {
    SessionModel::new(
        RoundConfig::new(round_name, total_arrows, arrows_per_end),
        10,
    )
    .expect("valid round config")
}

/// Records every arrow then saves the end.
pub fn shoot_end(model: &mut SessionModel, values: &[&str]) {
    for arrow in arrows(values) {
        assert!(model.record_arrow(arrow), "arrow {} was dropped", arrow.value);
    }
    model.save_end().expect("full end saves");
}

/// The eighteen-arrow regression round in ends of three.
pub const REGRESSION_ENDS: [[&str; 3]; 6] = [
    ["10", "9", "8"],
    ["X", "10", "M"],
    ["7", "7", "6"],
    ["5", "5", "5"],
    ["10", "10", "10"],
    ["9", "9", "9"],
];
