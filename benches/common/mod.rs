#![allow(dead_code)]

use criterion::PlotConfiguration;
use rand::distributions::{Distribution, Uniform};
use rand::prelude::ThreadRng;
use rand::Rng;
use slidebits::BitVec;

pub const SIZES: [usize; 6] = [1 << 8, 1 << 10, 1 << 12, 1 << 14, 1 << 16, 1 << 18];

pub fn construct_random_vec(rng: &mut ThreadRng, len: usize) -> BitVec {
    (0..len).map(|_| rng.gen_bool(0.5)).collect()
}

pub fn fill_random_bytes(rng: &mut ThreadRng, len: usize) -> Vec<u8> {
    let sample = Uniform::new_inclusive(0, u8::MAX);
    (0..len).map(|_| sample.sample(rng)).collect()
}

pub fn plot_config() -> PlotConfiguration {
    PlotConfiguration::default().summary_scale(criterion::AxisScale::Logarithmic)
}
