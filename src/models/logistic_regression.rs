//! Multinomial logistic regression on Candle tensors.

use candle_core::{DType, Device, Tensor, Var, D};
use candle_nn::{AdamW, Linear, Module, Optimizer, ParamsAdamW};
use serde::{Deserialize, Serialize};

/// Optimisation settings for [`LogisticRegression::fit`].
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Inverse L2 regularisation strength.
    pub c: f64,
    /// Stop once the loss moves less than this between iterations.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            learning_rate: 0.05,
            c: 1.0,
            tolerance: 1e-7,
        }
    }
}

/// Linear layer followed by a softmax over the class axis.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    linear: Linear,
    num_features: usize,
    num_classes: usize,
    device: Device,
}

/// Plain-float weights of a fitted [`LogisticRegression`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub num_features: usize,
    pub num_classes: usize,
    /// Row-major `num_classes x num_features`.
    pub weight: Vec<f32>,
    pub bias: Vec<f32>,
}

impl LogisticRegression {
    /// Fits on `features` (`n x num_features`, f32) against class ids in
    /// `targets` (`n`, u32). Weights start at zero so a given input always
    /// produces the same model.
    pub fn fit(
        features: &Tensor,
        targets: &Tensor,
        num_classes: usize,
        options: &FitOptions,
    ) -> anyhow::Result<(Self, f32)> {
        let (n, num_features) = features.dims2()?;
        let device = features.device().clone();

        let weight = Var::zeros((num_classes, num_features), DType::F32, &device)?;
        let bias = Var::zeros(num_classes, DType::F32, &device)?;
        let mut optimizer = AdamW::new(
            vec![weight.clone(), bias.clone()],
            ParamsAdamW {
                lr: options.learning_rate,
                weight_decay: 0.0,
                ..Default::default()
            },
        )?;
        let penalty_scale = 0.5 / (options.c * n as f64);

        let mut previous = f32::INFINITY;
        let mut loss_value = f32::INFINITY;
        for iteration in 0..options.max_iter {
            let linear = Linear::new(weight.as_tensor().clone(), Some(bias.as_tensor().clone()));
            let logits = linear.forward(features)?;
            let data_loss = candle_nn::loss::cross_entropy(&logits, targets)?;
            let penalty = weight.as_tensor().sqr()?.sum_all()?.affine(penalty_scale, 0.0)?;
            let loss = (data_loss + penalty)?;
            optimizer.backward_step(&loss)?;

            loss_value = loss.to_scalar::<f32>()?;
            if iteration % 100 == 0 {
                tracing::debug!(iteration, loss = loss_value, "logistic regression step");
            }
            if ((previous - loss_value).abs() as f64) < options.tolerance {
                tracing::debug!(iteration, loss = loss_value, "converged");
                break;
            }
            previous = loss_value;
        }

        if !loss_value.is_finite() {
            anyhow::bail!("training diverged, final loss is {}", loss_value);
        }

        let linear = Linear::new(
            weight.as_tensor().detach(),
            Some(bias.as_tensor().detach()),
        );
        Ok((
            Self {
                linear,
                num_features,
                num_classes,
                device,
            },
            loss_value,
        ))
    }

    pub fn from_artifact(artifact: &LinearArtifact, device: &Device) -> anyhow::Result<Self> {
        let LinearArtifact {
            num_features,
            num_classes,
            ..
        } = *artifact;
        if num_features == 0 || num_classes == 0 {
            anyhow::bail!("classifier has an empty weight matrix");
        }
        let expected = num_classes.checked_mul(num_features).ok_or_else(|| {
            anyhow::anyhow!("weight shape {} x {} overflows", num_classes, num_features)
        })?;
        if artifact.weight.len() != expected {
            anyhow::bail!(
                "weight has {} values, expected {} x {}",
                artifact.weight.len(),
                num_classes,
                num_features
            );
        }
        if artifact.bias.len() != num_classes {
            anyhow::bail!(
                "bias has {} values, expected {}",
                artifact.bias.len(),
                num_classes
            );
        }
        if !artifact.weight.iter().chain(&artifact.bias).all(|v| v.is_finite()) {
            anyhow::bail!("classifier weights contain non-finite values");
        }
        let weight = Tensor::from_vec(artifact.weight.clone(), (num_classes, num_features), device)?;
        let bias = Tensor::from_vec(artifact.bias.clone(), num_classes, device)?;
        Ok(Self {
            linear: Linear::new(weight, Some(bias)),
            num_features,
            num_classes,
            device: device.clone(),
        })
    }

    pub fn to_artifact(&self) -> anyhow::Result<LinearArtifact> {
        let weight = self.linear.weight().flatten_all()?.to_vec1::<f32>()?;
        let bias = match self.linear.bias() {
            Some(b) => b.to_vec1::<f32>()?,
            None => vec![0.0; self.num_classes],
        };
        Ok(LinearArtifact {
            num_features: self.num_features,
            num_classes: self.num_classes,
            weight,
            bias,
        })
    }

    /// Class probabilities, `n x num_classes`.
    pub fn predict_proba(&self, features: &Tensor) -> anyhow::Result<Tensor> {
        let logits = self.linear.forward(features)?;
        Ok(candle_nn::ops::softmax(&logits, D::Minus1)?)
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (Tensor, Tensor) {
        let x = Tensor::new(
            &[[1f32, 0.0], [0.9, 0.1], [0.0, 1.0], [0.1, 0.9]],
            &Device::Cpu,
        )
        .unwrap();
        let y = Tensor::new(&[0u32, 0, 2, 2], &Device::Cpu).unwrap();
        (x, y)
    }

    #[test]
    fn learns_separable_classes() {
        let (x, y) = toy();
        let options = FitOptions {
            max_iter: 300,
            learning_rate: 0.1,
            ..FitOptions::default()
        };
        let (model, _) = LogisticRegression::fit(&x, &y, 3, &options).unwrap();
        let probs = model.predict_proba(&x).unwrap().to_vec2::<f32>().unwrap();
        assert!(probs[0][0] > probs[0][2]);
        assert!(probs[2][2] > probs[2][0]);
        for row in probs {
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn artifact_round_trip() {
        let (x, y) = toy();
        let options = FitOptions {
            max_iter: 20,
            ..FitOptions::default()
        };
        let (model, _) = LogisticRegression::fit(&x, &y, 3, &options).unwrap();
        let restored =
            LogisticRegression::from_artifact(&model.to_artifact().unwrap(), &Device::Cpu).unwrap();
        let a = model.predict_proba(&x).unwrap().to_vec2::<f32>().unwrap();
        let b = restored.predict_proba(&x).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_shapes() {
        let artifact = LinearArtifact {
            num_features: 2,
            num_classes: 3,
            weight: vec![0.0; 5],
            bias: vec![0.0; 3],
        };
        assert!(LogisticRegression::from_artifact(&artifact, &Device::Cpu).is_err());
    }

    #[test]
    fn rejects_overflowing_shapes() {
        let artifact = LinearArtifact {
            num_features: usize::MAX / 2 + 1,
            num_classes: 5,
            weight: vec![0.0; 5],
            bias: vec![0.0; 5],
        };
        assert!(LogisticRegression::from_artifact(&artifact, &Device::Cpu).is_err());
    }

    #[test]
    fn rejects_non_finite_weights() {
        let mut artifact = LinearArtifact {
            num_features: 2,
            num_classes: 2,
            weight: vec![0.5, f32::NAN, 0.0, 1.0],
            bias: vec![0.0; 2],
        };
        assert!(LogisticRegression::from_artifact(&artifact, &Device::Cpu).is_err());
        artifact.weight[1] = 0.0;
        artifact.bias[0] = f32::INFINITY;
        assert!(LogisticRegression::from_artifact(&artifact, &Device::Cpu).is_err());
        artifact.bias[0] = 0.0;
        assert!(LogisticRegression::from_artifact(&artifact, &Device::Cpu).is_ok());
    }

    #[test]
    fn non_finite_loss_fails_the_fit() {
        let (x, y) = toy();
        let options = FitOptions {
            max_iter: 5,
            c: f64::NAN,
            ..FitOptions::default()
        };
        assert!(LogisticRegression::fit(&x, &y, 3, &options).is_err());
    }
}
