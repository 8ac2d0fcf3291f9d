#![allow(dead_code)]

use polymethod::{BuildError, DispatchError, Dispatchable, MethodRegistry};
use std::f64::consts::PI;

// ============================================================================
// Shapes
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Square {
    pub side: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

/// A shape nobody knows how to measure.
#[derive(Clone, Debug, PartialEq)]
pub struct Blancmange;

#[derive(Clone, Debug, PartialEq, Dispatchable)]
pub enum Shape {
    Circle(Circle),
    Square(Square),
    Rectangle(Rectangle),
    Blancmange(Blancmange),
}

pub fn circle(radius: f64) -> Shape {
    Shape::Circle(Circle { radius })
}

pub fn square(side: f64) -> Shape {
    Shape::Square(Square { side })
}

pub fn rectangle(width: f64, height: f64) -> Shape {
    Shape::Rectangle(Rectangle { width, height })
}

pub fn blancmange() -> Shape {
    Shape::Blancmange(Blancmange)
}

// ============================================================================
// Declarations
// ============================================================================

/// Declares `area` and `perimeter` for circles, squares and rectangles.
pub fn declare_measurements(registry: &mut MethodRegistry) -> Result<(), BuildError> {
    registry
        .method::<Shape, f64>("area")
        .declare_variant(|c: &Circle| Ok(c.radius * c.radius * PI))?
        .declare_variant(|s: &Square| Ok(s.side * s.side))?
        .declare_variant(|r: &Rectangle| Ok(r.width * r.height))?;

    registry
        .method::<Shape, f64>("perimeter")
        .declare_variant(|c: &Circle| Ok(c.radius * 2.0 * PI))?
        .declare_variant(|s: &Square| Ok(s.side * 4.0))?
        .declare_variant(|r: &Rectangle| Ok(2.0 * (r.width + r.height)))?;

    Ok(())
}

/// A handler that refuses to run.
pub fn refuse(shape: &Shape) -> Result<f64, DispatchError> {
    let message = format!("refusing to measure {shape:?}");
    Err(DispatchError::handler(message))
}
