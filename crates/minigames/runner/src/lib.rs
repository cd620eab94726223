//! Course generation for the runner minigame.
//!
//! A course is a short fixed-length obstacle sequence laid out at regular
//! horizontal intervals. Each slot is a coin flip between a plain jump and a
//! math gate carrying a small arithmetic answer the player keys in mid-run.
//! Generation is pure given a randomness source; the caller decides whether
//! to share one course between players (the server caches them briefly).

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Obstacles per course.
pub const COURSE_LEN: usize = 5;
/// Horizontal offset of the first obstacle.
pub const FIRST_POSITION: u32 = 100;
/// Spacing between consecutive obstacles.
pub const SPACING: u32 = 200;

const ADD_SUB_MAX: i32 = 20;
const MUL_MAX: i32 = 10;

/// One course element, in its wire shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
    pub position: u32,
    /// Expected answer for math gates; absent on plain jumps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Math,
    Jump,
}

/// A generated arithmetic problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblem {
    pub question: String,
    pub answer: i32,
}

/// Generate a course from ambient entropy.
pub fn generate() -> Vec<Obstacle> {
    generate_course(&mut rand::thread_rng())
}

/// Generate a course from the supplied randomness source.
pub fn generate_course<R: Rng>(rng: &mut R) -> Vec<Obstacle> {
    (0..COURSE_LEN)
        .map(|i| {
            let position = FIRST_POSITION + i as u32 * SPACING;
            if rng.gen_bool(0.5) {
                Obstacle {
                    kind: ObstacleKind::Math,
                    position,
                    value: Some(math_problem(rng).answer),
                }
            } else {
                Obstacle {
                    kind: ObstacleKind::Jump,
                    position,
                    value: None,
                }
            }
        })
        .collect()
}

/// Generate one arithmetic problem: add, subtract or multiply, chosen
/// uniformly. Subtraction draws its second operand at or below the first,
/// so answers are never negative.
pub fn math_problem<R: Rng>(rng: &mut R) -> MathProblem {
    match rng.gen_range(0..3) {
        0 => {
            let a = rng.gen_range(1..=ADD_SUB_MAX);
            let b = rng.gen_range(1..=ADD_SUB_MAX);
            MathProblem {
                question: format!("{a} + {b} = ?"),
                answer: a + b,
            }
        }
        1 => {
            let a = rng.gen_range(1..=ADD_SUB_MAX);
            let b = rng.gen_range(1..=a);
            MathProblem {
                question: format!("{a} - {b} = ?"),
                answer: a - b,
            }
        }
        _ => {
            let a = rng.gen_range(1..=MUL_MAX);
            let b = rng.gen_range(1..=MUL_MAX);
            MathProblem {
                question: format!("{a} × {b} = ?"),
                answer: a * b,
            }
        }
    }
}
