//! Gradient-Boosted Tree Ensemble
//!
//! Binary logistic tree ensemble exported from training as JSON.
//! Each tree is a flat node array rooted at index 0. A split sends the
//! sample left when `x[feature] < threshold`, right otherwise; leaves hold
//! margin contributions. `p = sigmoid(base_margin + sum(leaves))`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::artifact::{load_artifact, ArtifactKind};
use super::inference::{check_input_width, check_probability, sigmoid, Classifier};
use crate::error::{DetectError, DetectResult};
use crate::logic::features::{NormalizedVector, FEATURE_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Children must come after their parent, which also rules out cycles
    fn validate(&self, index: usize, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {} has no nodes", index));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= width {
                        return Err(format!(
                            "tree {} node {} splits on feature {} (width {})",
                            index, i, feature, width
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("tree {} node {} has NaN threshold", index, i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!(
                                "tree {} node {} has invalid child {}",
                                index, i, child
                            ));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("tree {} node {} has non-finite leaf", index, i));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, input: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if input[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_margin: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self, width: usize) -> Result<(), String> {
        if !self.base_margin.is_finite() {
            return Err("base_margin is not finite".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, width)?;
        }
        Ok(())
    }

    pub fn margin(&self, input: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.evaluate(input)).sum::<f64>()
    }
}

pub struct TreeEnsembleClassifier {
    ensemble: TreeEnsemble,
    name: String,
}

impl TreeEnsembleClassifier {
    pub fn new(ensemble: TreeEnsemble) -> DetectResult<Self> {
        ensemble
            .validate(FEATURE_COUNT)
            .map_err(|reason| DetectError::Inference(format!("invalid ensemble: {}", reason)))?;

        Ok(Self {
            name: format!("tree_ensemble({} trees)", ensemble.trees.len()),
            ensemble,
        })
    }

    /// Load a `tree_ensemble` artifact
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> DetectResult<Self> {
        let artifact =
            load_artifact::<TreeEnsemble>(path, ArtifactKind::TreeEnsemble, expected_sha256)?;

        artifact
            .payload
            .validate(artifact.schema.feature_count)
            .map_err(|reason| DetectError::artifact(path, reason))?;

        let model = Self::new(artifact.payload)?;
        log::info!("Tree ensemble loaded: {} from {}", model.name, path.display());
        Ok(model)
    }

    pub fn tree_count(&self) -> usize {
        self.ensemble.trees.len()
    }
}

impl Classifier for TreeEnsembleClassifier {
    fn predict_probability(&self, input: &NormalizedVector) -> DetectResult<f64> {
        check_input_width(self, input)?;
        check_probability(sigmoid(self.ensemble.margin(input.as_slice())))
    }

    fn input_width(&self) -> usize {
        FEATURE_COUNT
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::artifact::{save_artifact, Artifact};

    fn input(values: [f64; FEATURE_COUNT]) -> NormalizedVector {
        NormalizedVector::new(0, values)
    }

    /// duration (3) < 0.5 → -2.0 else +2.0; second tree adds +0.5 for rate (5) >= 1
    fn ensemble() -> TreeEnsemble {
        TreeEnsemble {
            base_margin: 0.0,
            trees: vec![
                Tree {
                    nodes: vec![
                        TreeNode::Split { feature: 3, threshold: 0.5, left: 1, right: 2 },
                        TreeNode::Leaf { leaf: -2.0 },
                        TreeNode::Leaf { leaf: 2.0 },
                    ],
                },
                Tree {
                    nodes: vec![
                        TreeNode::Split { feature: 5, threshold: 1.0, left: 1, right: 2 },
                        TreeNode::Leaf { leaf: 0.0 },
                        TreeNode::Leaf { leaf: 0.5 },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_predict_probability() {
        let model = TreeEnsembleClassifier::new(ensemble()).unwrap();

        let low = model.predict_probability(&input([0.0; FEATURE_COUNT])).unwrap();
        assert!((low - sigmoid(-2.0)).abs() < 1e-12);

        let high = model
            .predict_probability(&input([0.0, 0.0, 0.0, 1.0, 0.0, 3.0]))
            .unwrap();
        assert!((high - sigmoid(2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_is_strict_less_than() {
        let model = TreeEnsembleClassifier::new(ensemble()).unwrap();
        // Exactly at the threshold goes right
        let p = model
            .predict_probability(&input([0.0, 0.0, 0.0, 0.5, 0.0, 0.0]))
            .unwrap();
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_cycles_and_bad_features() {
        let mut cyclic = ensemble();
        cyclic.trees[0].nodes[0] =
            TreeNode::Split { feature: 0, threshold: 0.0, left: 0, right: 2 };
        assert!(TreeEnsembleClassifier::new(cyclic).is_err());

        let mut wide = ensemble();
        wide.trees[1].nodes[0] = TreeNode::Split { feature: 9, threshold: 0.0, left: 1, right: 2 };
        assert!(TreeEnsembleClassifier::new(wide).is_err());

        let empty = TreeEnsemble { base_margin: 0.0, trees: vec![] };
        assert!(TreeEnsembleClassifier::new(empty).is_err());
    }

    #[test]
    fn test_node_json_shape() {
        let nodes: Vec<TreeNode> = serde_json::from_str(
            r#"[{"feature": 2, "threshold": 0.5, "left": 1, "right": 2}, {"leaf": -0.3}, {"leaf": 0.7}]"#,
        )
        .unwrap();
        assert_eq!(nodes[1], TreeNode::Leaf { leaf: -0.3 });
    }

    #[test]
    fn test_load_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xgboost_model.json");
        save_artifact(&path, &Artifact::new(ArtifactKind::TreeEnsemble, ensemble())).unwrap();

        let model = TreeEnsembleClassifier::load(&path, None).unwrap();
        assert_eq!(model.tree_count(), 2);
        assert_eq!(model.input_width(), FEATURE_COUNT);
    }

    #[test]
    fn test_load_dispatch_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_artifact(&path, &Artifact::new(ArtifactKind::TreeEnsemble, ensemble())).unwrap();

        let model = crate::logic::model::inference::load_classifier(&path, None).unwrap();
        assert!(model.name().starts_with("tree_ensemble"));
    }
}
