use ndarray::Array1;

pub(crate) fn l2_normalize(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-12 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

pub(crate) fn l1_normalize(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|x| x.abs()).sum();
    if norm > 1e-12 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// Numerically stable logistic function.
pub(crate) fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
