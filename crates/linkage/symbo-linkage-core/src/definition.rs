//! Building linkages from serializable [`LinkageSpec`] documents and exporting them back.

use hashbrown::HashMap;

use crate::error::LinkageError;
use crate::linkage::Linkage;
use crate::types::{JointId, JointKind, JointSpec, JointSpecKind, LinkageSpec};

impl LinkageSpec {
    pub fn from_json(json: &str) -> Result<Self, LinkageError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LinkageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Linkage {
    /// Add every joint and bar of `spec`. The result still needs [`Linkage::prepare`].
    ///
    /// A motorized joint must name a motor listed before it.
    pub fn from_spec(spec: &LinkageSpec) -> Result<Linkage, LinkageError> {
        let mut linkage = Linkage::new();
        let mut ids: HashMap<&str, JointId> = HashMap::with_capacity(spec.joints.len());

        for joint in &spec.joints {
            let index = match &joint.kind {
                JointSpecKind::Static => linkage.add_static_joint(joint.x, joint.y),
                JointSpecKind::Dynamic => linkage.add_dynamic_joint(joint.x, joint.y),
                JointSpecKind::Motorized { motor, distance } => {
                    let motor_index = ids.get(motor.as_str()).copied().ok_or_else(|| {
                        LinkageError::InvalidDefinition(format!(
                            "joint '{}' is driven by unknown or later joint '{}'",
                            joint.id, motor
                        ))
                    })?;
                    linkage.add_motorized_joint(joint.x, joint.y, motor_index, *distance)?
                }
            };
            if ids.insert(joint.id.as_str(), index).is_some() {
                return Err(LinkageError::InvalidDefinition(format!(
                    "duplicate joint id '{}'",
                    joint.id
                )));
            }
        }

        for [a, b] in &spec.bars {
            let lookup = |id: &String| {
                ids.get(id.as_str()).copied().ok_or_else(|| {
                    LinkageError::InvalidDefinition(format!("bar references unknown joint '{id}'"))
                })
            };
            linkage.add_bar(lookup(a)?, lookup(b)?)?;
        }

        Ok(linkage)
    }

    /// Parse and build in one go.
    pub fn from_json(json: &str) -> Result<Linkage, LinkageError> {
        Linkage::from_spec(&LinkageSpec::from_json(json)?)
    }

    /// Export joints and bars. Joint ids are `j{index}`; dynamic rest distances are not
    /// part of a definition.
    pub fn to_spec(&self) -> LinkageSpec {
        let id = |index: JointId| format!("j{index}");
        let joints = self
            .joints()
            .iter()
            .map(|joint| JointSpec {
                id: id(joint.index),
                kind: match &joint.kind {
                    JointKind::Static => JointSpecKind::Static,
                    JointKind::Dynamic { .. } => JointSpecKind::Dynamic,
                    JointKind::Motorized {
                        motor,
                        distance_to_motor,
                        ..
                    } => JointSpecKind::Motorized {
                        motor: id(*motor),
                        distance: Some(*distance_to_motor),
                    },
                },
                x: joint.initial.x,
                y: joint.initial.y,
            })
            .collect();
        let bars = self.bars().iter().map(|bar| [id(bar.a), id(bar.b)]).collect();
        LinkageSpec { joints, bars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_BAR: &str = r#"{
        "joints": [
            { "id": "A", "kind": "static", "x": 0.0, "y": 0.0 },
            { "id": "D", "kind": "static", "x": 4.0, "y": 0.0 },
            { "id": "B", "kind": "motorized", "motor": "A", "x": 1.0, "y": 0.0 },
            { "id": "C", "kind": "dynamic", "x": 3.5, "y": 2.5 }
        ],
        "bars": [["A", "B"], ["B", "C"], ["C", "D"]]
    }"#;

    #[test]
    fn builds_in_document_order() {
        let linkage = Linkage::from_json(FOUR_BAR).unwrap();
        assert_eq!(linkage.joint_count(), 4);
        assert_eq!(linkage.bars().len(), 3);
        assert_eq!(linkage.motorized(), &[2]);
        assert_eq!(linkage.bar_between(3, 1), Some(2));
    }

    #[test]
    fn rejects_unknown_references() {
        let spec = LinkageSpec::from_json(
            r#"{ "joints": [ { "id": "A", "kind": "static", "x": 0.0, "y": 0.0 } ],
                 "bars": [["A", "Z"]] }"#,
        )
        .unwrap();
        assert!(matches!(
            Linkage::from_spec(&spec),
            Err(LinkageError::InvalidDefinition(_))
        ));

        let forward_motor = r#"{ "joints": [
            { "id": "M", "kind": "motorized", "motor": "A", "x": 1.0, "y": 0.0 },
            { "id": "A", "kind": "static", "x": 0.0, "y": 0.0 } ] }"#;
        assert!(Linkage::from_json(forward_motor).is_err());
    }

    #[test]
    fn export_round_trips_structure() {
        let linkage = Linkage::from_json(FOUR_BAR).unwrap();
        let rebuilt = Linkage::from_spec(&linkage.to_spec()).unwrap();
        assert_eq!(rebuilt.joints(), linkage.joints());
        assert_eq!(rebuilt.bars(), linkage.bars());
    }
}
