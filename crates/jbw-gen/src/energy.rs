use core::fmt;
use std::sync::Arc;

use jbw_core::Position;

pub type IntensityCallback = dyn Fn(Position, usize) -> f64 + Send + Sync;
pub type InteractionCallback = dyn Fn(Position, Position, usize, usize) -> f64 + Send + Sync;

/// Source of the energy terms the Gibbs sampler combines.
///
/// Both functions must be pure: the sampler may call them any number of times
/// in any order within a sweep.
pub trait EnergyModel {
    fn item_type_count(&self) -> usize;

    /// Energy of placing `item_type` at `position`, ignoring neighbors.
    fn intensity(&self, position: Position, item_type: usize) -> f64;

    /// Pairwise energy between a candidate `type_a` at `a` and an existing
    /// `type_b` item at `b`.
    fn interaction(&self, a: Position, b: Position, type_a: usize, type_b: usize) -> f64;
}

/// Per-type intensity term.
#[derive(Clone, Default)]
pub enum IntensityFn {
    #[default]
    Zero,
    Constant {
        value: f64,
    },
    Custom(Arc<IntensityCallback>),
}

impl IntensityFn {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Position, usize) -> f64 + Send + Sync + 'static,
    {
        IntensityFn::Custom(Arc::new(f))
    }

    pub fn eval(&self, position: Position, item_type: usize) -> f64 {
        match self {
            IntensityFn::Zero => 0.0,
            IntensityFn::Constant { value } => *value,
            IntensityFn::Custom(f) => f(position, item_type),
        }
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        match self {
            IntensityFn::Constant { value } if !value.is_finite() => {
                Err(format!("constant intensity {value} is not finite"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for IntensityFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntensityFn::Zero => f.write_str("Zero"),
            IntensityFn::Constant { value } => {
                f.debug_struct("Constant").field("value", value).finish()
            }
            IntensityFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Pairwise interaction term between two item types.
#[derive(Clone, Default)]
pub enum InteractionFn {
    #[default]
    Zero,
    /// Two nested boxes on squared Euclidean distance `d2`:
    /// `first_value` if `d2 < first_cutoff`, `second_value` if `d2 < second_cutoff`, else 0.
    /// With `second_cutoff <= first_cutoff` the second band is empty.
    PiecewiseBox {
        first_cutoff: f64,
        second_cutoff: f64,
        first_value: f64,
        second_value: f64,
    },
    /// Chebyshev-distance bands, with separate values for pairs that share a
    /// row or column ("axis") and pairs that don't ("diagonal").
    Cross {
        near_cutoff: f64,
        far_cutoff: f64,
        near_axis: f64,
        near_diagonal: f64,
        far_axis: f64,
        far_diagonal: f64,
    },
    Custom(Arc<InteractionCallback>),
}

impl InteractionFn {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Position, Position, usize, usize) -> f64 + Send + Sync + 'static,
    {
        InteractionFn::Custom(Arc::new(f))
    }

    pub fn eval(&self, a: Position, b: Position, type_a: usize, type_b: usize) -> f64 {
        match self {
            InteractionFn::Zero => 0.0,
            InteractionFn::PiecewiseBox {
                first_cutoff,
                second_cutoff,
                first_value,
                second_value,
            } => {
                let d2 = (a - b).squared_length() as f64;
                if d2 < *first_cutoff {
                    *first_value
                } else if d2 < *second_cutoff {
                    *second_value
                } else {
                    0.0
                }
            }
            InteractionFn::Cross {
                near_cutoff,
                far_cutoff,
                near_axis,
                near_diagonal,
                far_axis,
                far_diagonal,
            } => {
                let d = a.chebyshev(b) as f64;
                let on_axis = a.x == b.x || a.y == b.y;
                let (near, far) = if on_axis {
                    (*near_axis, *far_axis)
                } else {
                    (*near_diagonal, *far_diagonal)
                };
                if d <= *near_cutoff {
                    near
                } else if d <= *far_cutoff {
                    far
                } else {
                    0.0
                }
            }
            InteractionFn::Custom(f) => f(a, b, type_a, type_b),
        }
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        match self {
            InteractionFn::Zero | InteractionFn::Custom(_) => Ok(()),
            InteractionFn::PiecewiseBox {
                first_cutoff,
                second_cutoff,
                first_value,
                second_value,
            } => {
                let all = [*first_cutoff, *second_cutoff, *first_value, *second_value];
                if all.iter().any(|v| !v.is_finite()) {
                    return Err("piecewise_box parameters must be finite".to_string());
                }
                if *first_cutoff < 0.0 || *second_cutoff < 0.0 {
                    return Err(format!(
                        "piecewise_box cutoffs must be non-negative, got {first_cutoff} and {second_cutoff}"
                    ));
                }
                Ok(())
            }
            InteractionFn::Cross {
                near_cutoff,
                far_cutoff,
                near_axis,
                near_diagonal,
                far_axis,
                far_diagonal,
            } => {
                let all = [
                    *near_cutoff,
                    *far_cutoff,
                    *near_axis,
                    *near_diagonal,
                    *far_axis,
                    *far_diagonal,
                ];
                if all.iter().any(|v| !v.is_finite()) {
                    return Err("cross parameters must be finite".to_string());
                }
                if near_cutoff < &0.0 || near_cutoff > far_cutoff {
                    return Err(format!(
                        "cross cutoffs must satisfy 0 <= near ({near_cutoff}) <= far ({far_cutoff})"
                    ));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for InteractionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionFn::Zero => f.write_str("Zero"),
            InteractionFn::PiecewiseBox {
                first_cutoff,
                second_cutoff,
                first_value,
                second_value,
            } => f
                .debug_struct("PiecewiseBox")
                .field("first_cutoff", first_cutoff)
                .field("second_cutoff", second_cutoff)
                .field("first_value", first_value)
                .field("second_value", second_value)
                .finish(),
            InteractionFn::Cross {
                near_cutoff,
                far_cutoff,
                near_axis,
                near_diagonal,
                far_axis,
                far_diagonal,
            } => f
                .debug_struct("Cross")
                .field("near_cutoff", near_cutoff)
                .field("far_cutoff", far_cutoff)
                .field("near_axis", near_axis)
                .field("near_diagonal", near_diagonal)
                .field("far_axis", far_axis)
                .field("far_diagonal", far_diagonal)
                .finish(),
            InteractionFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
