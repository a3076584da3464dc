//! Per-frame hand pose recognition

use super::cache::TemplateLookup;
use super::template::PoseTemplate;
use crate::config::{PoseConfig, PoseEntry};
use crate::hand::{Handedness, JointBuffer};
use crate::spatial::Quaternion;

/// Best-matching pose for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub name: String,
    /// Name emitted on the previous successful match, if any
    pub previous_name: Option<String>,
    /// Smallest gap between the best distance and any other distance seen
    /// during the scan. Infinite when only one template was compared.
    pub confidence_margin: f32,
}

impl MatchResult {
    pub fn changed(&self) -> bool {
        self.previous_name.as_deref() != Some(self.name.as_str())
    }
}

/// Weighted mean angle between live joint rotations and a template.
///
/// Joint 0 (the wrist) is skipped. Only the joints both sides have are
/// compared; `epsilon` keeps an all-zero weight set finite.
pub fn pose_distance(live: &[Quaternion], template: &PoseTemplate, mirror: bool, epsilon: f32) -> f32 {
    let n = live.len().min(template.joint_count());
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;

    for i in 1..n {
        let target = if mirror {
            template.rotations()[i].mirrored()
        } else {
            template.rotations()[i]
        };
        let weight = template.weights()[i];
        weighted += live[i].angle_between(&target) * weight;
        weight_sum += weight;
    }

    weighted / (weight_sum + epsilon)
}

pub struct PoseMatcher {
    candidates: Vec<PoseEntry>,
    template_handedness: Handedness,
    weight_epsilon: f32,
    previous: Option<String>,
}

impl PoseMatcher {
    pub fn new(candidates: Vec<PoseEntry>, template_handedness: Handedness, weight_epsilon: f32) -> Self {
        Self {
            candidates,
            template_handedness,
            weight_epsilon,
            previous: None,
        }
    }

    pub fn from_config(config: &PoseConfig) -> Self {
        Self::new(
            config.library.clone(),
            config.template_handedness,
            config.weight_epsilon,
        )
    }

    pub fn candidates(&self) -> &[PoseEntry] {
        &self.candidates
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Templates are authored for one hand; the other hand compares against
    /// their mirror image.
    pub fn mirror_for(&self, handedness: Handedness) -> bool {
        handedness != self.template_handedness
    }

    /// Score every ready template against the buffer.
    ///
    /// Returns `None` when the buffer is invalid or no template has loaded yet.
    pub fn update(&mut self, buffer: &JointBuffer, templates: &dyn TemplateLookup) -> Option<MatchResult> {
        if !buffer.is_valid() {
            return None;
        }

        let live = buffer.rotations();
        let mirror = self.mirror_for(buffer.handedness());

        let mut best = f32::INFINITY;
        let mut margin = f32::INFINITY;
        let mut best_name: Option<&str> = None;

        for entry in &self.candidates {
            let Some(template) = templates.get_template(&entry.path).ready().cloned() else {
                continue;
            };
            let distance = pose_distance(&live, &template, mirror, self.weight_epsilon);
            if distance < best {
                margin = margin.min(best - distance);
                best = distance;
                best_name = Some(&entry.name);
            } else {
                margin = margin.min(distance - best);
            }
        }

        let name = best_name?.to_string();
        tracing::trace!(pose = %name, distance = best, margin, "Pose matched");

        let previous_name = self.previous.replace(name.clone());
        Some(MatchResult {
            name,
            previous_name,
            confidence_margin: margin,
        })
    }

    /// Forget the last emitted pose
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::TemplateState;
    use crate::spatial::{Point3D, RigidTransform, Vector3D};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct Library(HashMap<String, Arc<PoseTemplate>>);

    impl Library {
        fn with(mut self, path: &str, template: PoseTemplate) -> Self {
            self.0.insert(path.to_string(), Arc::new(template));
            self
        }
    }

    impl TemplateLookup for Library {
        fn get_template(&self, path: &str) -> TemplateState {
            match self.0.get(path) {
                Some(t) => TemplateState::Ready(Arc::clone(t)),
                None => TemplateState::Pending,
            }
        }
    }

    fn entry(name: &str) -> PoseEntry {
        PoseEntry {
            name: name.to_string(),
            path: format!("{name}.bin"),
        }
    }

    fn curled(angle: f32) -> Vec<Quaternion> {
        let mut rotations = vec![Quaternion::IDENTITY];
        rotations.extend((1..4).map(|i| {
            Quaternion::from_axis_angle(Vector3D::new(1.0, 0.3 * i as f32, 0.1), angle)
        }));
        rotations
    }

    fn template(angle: f32) -> PoseTemplate {
        PoseTemplate::new(curled(angle), vec![1.0; 4]).unwrap()
    }

    fn buffer(handedness: Handedness, rotations: &[Quaternion]) -> JointBuffer {
        let locals: Vec<_> = rotations
            .iter()
            .map(|q| RigidTransform::new(Point3D::ORIGIN, *q))
            .collect();
        JointBuffer::from_local_transforms(handedness, &locals)
    }

    #[test]
    fn test_distance_ignores_wrist_and_weights_joints() {
        let mut rotations = curled(0.5);
        rotations[0] = Quaternion::from_axis_angle(Vector3D::UP, 2.0);
        let exact = pose_distance(&rotations, &template(0.5), false, 1e-5);
        assert!(exact < 1e-3);

        let zero_weights = PoseTemplate::new(curled(1.5), vec![0.0; 4]).unwrap();
        assert_eq!(pose_distance(&curled(0.1), &zero_weights, false, 1e-5), 0.0);
    }

    #[test]
    fn test_distance_uses_shorter_side() {
        let live = curled(0.5);
        assert!(pose_distance(&live[..2], &template(0.5), false, 1e-5) < 1e-3);
        assert_eq!(pose_distance(&live[..1], &template(1.0), false, 1e-5), 0.0);
    }

    #[test]
    fn test_running_margin_over_candidate_order() {
        // Distances scanned in order: 0.5, 0.2, 0.4 => margin min(0.3, 0.2)
        let live = vec![
            Quaternion::IDENTITY,
            Quaternion::IDENTITY,
        ];
        let at = |angle: f32| {
            PoseTemplate::new(
                vec![Quaternion::IDENTITY, Quaternion::from_axis_angle(Vector3D::UP, angle)],
                vec![1.0, 1.0],
            )
            .unwrap()
        };
        let library = Library::default()
            .with("a.bin", at(0.5))
            .with("b.bin", at(0.2))
            .with("c.bin", at(0.4));
        let mut matcher = PoseMatcher::new(vec![entry("a"), entry("b"), entry("c")], Handedness::Right, 0.0);

        let result = matcher.update(&buffer(Handedness::Right, &live), &library).unwrap();
        assert_eq!(result.name, "b");
        assert!((result.confidence_margin - 0.2).abs() < 1e-4);
        assert_eq!(result.previous_name, None);
    }

    #[test]
    fn test_single_candidate_margin_is_infinite() {
        let library = Library::default().with("fist.bin", template(1.0));
        let mut matcher = PoseMatcher::new(vec![entry("fist")], Handedness::Right, 1e-5);
        let result = matcher
            .update(&buffer(Handedness::Right, &curled(0.2)), &library)
            .unwrap();
        assert_eq!(result.name, "fist");
        assert!(result.confidence_margin.is_infinite());
    }

    #[test]
    fn test_pending_templates_are_skipped() {
        let library = Library::default().with("open.bin", template(0.0));
        let mut matcher = PoseMatcher::new(vec![entry("fist"), entry("open")], Handedness::Right, 1e-5);
        let result = matcher
            .update(&buffer(Handedness::Right, &curled(0.1)), &library)
            .unwrap();
        assert_eq!(result.name, "open");

        let empty = Library::default();
        assert!(matcher.update(&buffer(Handedness::Right, &curled(0.1)), &empty).is_none());
    }

    #[test]
    fn test_invalid_buffer_yields_nothing() {
        let library = Library::default().with("fist.bin", template(1.0));
        let mut matcher = PoseMatcher::new(vec![entry("fist")], Handedness::Right, 1e-5);
        let invalid = JointBuffer::new(Handedness::Right, 4);
        assert!(matcher.update(&invalid, &library).is_none());
        assert_eq!(matcher.previous(), None);
    }

    #[test]
    fn test_previous_name_tracks_last_emission() {
        let library = Library::default()
            .with("open.bin", template(0.0))
            .with("fist.bin", template(1.4));
        let mut matcher = PoseMatcher::new(vec![entry("open"), entry("fist")], Handedness::Right, 1e-5);

        let first = matcher.update(&buffer(Handedness::Right, &curled(0.1)), &library).unwrap();
        assert_eq!(first.name, "open");
        assert!(first.changed());

        let second = matcher.update(&buffer(Handedness::Right, &curled(1.3)), &library).unwrap();
        assert_eq!(second.name, "fist");
        assert_eq!(second.previous_name.as_deref(), Some("open"));

        let third = matcher.update(&buffer(Handedness::Right, &curled(1.3)), &library).unwrap();
        assert!(!third.changed());

        matcher.reset();
        assert_eq!(matcher.previous(), None);
    }

    #[test]
    fn test_mirror_symmetry() {
        let right_template = template(0.9);
        let live = curled(0.6);
        let right = buffer(Handedness::Right, &live);
        let left = right.mirrored();

        let direct = pose_distance(&right.rotations(), &right_template, false, 1e-5);
        let mirrored = pose_distance(&left.rotations(), &right_template, true, 1e-5);
        assert!((direct - mirrored).abs() < 1e-4);
    }

    #[test]
    fn test_left_hand_matches_mirrored_templates() {
        let library = Library::default()
            .with("open.bin", template(0.0))
            .with("fist.bin", template(1.4));
        let mut matcher = PoseMatcher::new(vec![entry("open"), entry("fist")], Handedness::Right, 1e-5);
        assert!(matcher.mirror_for(Handedness::Left));
        assert!(!matcher.mirror_for(Handedness::Right));

        let left_fist = buffer(Handedness::Right, &curled(1.4)).mirrored();
        assert_eq!(left_fist.handedness(), Handedness::Left);
        let result = matcher.update(&left_fist, &library).unwrap();
        assert_eq!(result.name, "fist");
    }
}
