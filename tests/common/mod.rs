#![allow(dead_code)]

pub mod scenes;

pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
