use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Activation applied to every hidden layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenActivation {
    /// `max(0, x)`
    RectifiedLinear,
    /// `1 / (1 + e^-x)`
    Sigmoid,
    /// `tanh(x)`
    HyperbolicTangent,
}

/// Activation applied to the output layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputActivation {
    /// Row-wise normalized exponential.
    Softmax,
    /// `1 / (1 + e^-x)`
    Sigmoid,
    /// Leaves values unchanged.
    Identity,
}

impl HiddenActivation {
    /// Applies the activation element-wise, in place.
    pub fn apply(self, values: &mut Array2<f32>) {
        match self {
            HiddenActivation::RectifiedLinear => values.mapv_inplace(|x| x.max(0.0)),
            HiddenActivation::Sigmoid => values.mapv_inplace(sigmoid),
            HiddenActivation::HyperbolicTangent => values.mapv_inplace(f32::tanh),
        }
    }
}

impl OutputActivation {
    /// Applies the activation in place. Each row is
    /// one output vector of the batch.
    pub fn apply(self, values: &mut Array2<f32>) {
        match self {
            OutputActivation::Softmax => {
                for mut row in values.rows_mut() {
                    // Shift by the row max so exp never overflows.
                    let max = row.fold(f32::NEG_INFINITY, |m, x| m.max(*x));
                    row.mapv_inplace(|x| (x - max).exp());
                    let sum = row.sum();
                    row /= sum;
                }
            }
            OutputActivation::Sigmoid => values.mapv_inplace(sigmoid),
            OutputActivation::Identity => {}
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
