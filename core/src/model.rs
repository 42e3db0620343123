//! Sign and module data structures consumed by the alignment engine.
//!
//! This module defines the read-only view of an annotated sign:
//! - [`Sign`]: a gloss plus the modules coded for it
//! - [`Module`]: one annotation unit with a stable [`ModuleId`], optional articulators,
//!   and kind-specific [`ModuleContent`]
//! - [`FeatureTree`]: the narrow checked-node tree the movement and location matchers query
//!
//! The surrounding application owns the real annotation trees; it converts them into
//! these types once per comparison.

use crate::error::AlignError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Creation timestamp of a module.
///
/// Only ever used as a stable total order for coding-order fallback. Ordering and
/// equality go through `f64::total_cmp`, so every value (including NaN) has a place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub f64);

impl PartialEq for ModuleId {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for ModuleId {}

impl PartialOrd for ModuleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ModuleId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for ModuleId {
    fn from(value: f64) -> Self {
        ModuleId(value)
    }
}

/// The fixed set of module kinds a sign can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    SignType,
    Movement,
    Location,
    Relation,
    Orientation,
    HandConfiguration,
    NonManual,
}

impl ModuleKind {
    /// Every kind, in the order a comparison view lists them.
    pub const ALL: [ModuleKind; 7] = [
        ModuleKind::SignType,
        ModuleKind::Movement,
        ModuleKind::Location,
        ModuleKind::Relation,
        ModuleKind::Orientation,
        ModuleKind::HandConfiguration,
        ModuleKind::NonManual,
    ];

    /// Kinds whose alignment is first partitioned by articulator.
    pub fn uses_articulators(self) -> bool {
        matches!(
            self,
            ModuleKind::Movement
                | ModuleKind::Location
                | ModuleKind::Orientation
                | ModuleKind::HandConfiguration
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::SignType => "sign_type",
            ModuleKind::Movement => "movement",
            ModuleKind::Location => "location",
            ModuleKind::Relation => "relation",
            ModuleKind::Orientation => "orientation",
            ModuleKind::HandConfiguration => "hand_configuration",
            ModuleKind::NonManual => "non_manual",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The physical articulator a module applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Articulator {
    Hand,
    Arm,
    Leg,
}

impl Articulator {
    pub const ALL: [Articulator; 3] = [Articulator::Hand, Articulator::Arm, Articulator::Leg];

    pub(crate) fn index(self) -> usize {
        match self {
            Articulator::Hand => 0,
            Articulator::Arm => 1,
            Articulator::Leg => 2,
        }
    }
}

/// Which instance(s) of an articulator a module applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticulatorNumber {
    One,
    Two,
    Both,
}

impl ArticulatorNumber {
    pub const ALL: [ArticulatorNumber; 3] = [
        ArticulatorNumber::One,
        ArticulatorNumber::Two,
        ArticulatorNumber::Both,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ArticulatorNumber::One => 0,
            ArticulatorNumber::Two => 1,
            ArticulatorNumber::Both => 2,
        }
    }
}

/// Articulator assignment as coded on a module: the articulator plus the
/// per-instance selection flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticulatorSpec {
    pub articulator: Articulator,
    #[serde(default)]
    pub one: bool,
    #[serde(default)]
    pub two: bool,
}

impl ArticulatorSpec {
    pub fn new(articulator: Articulator, number: ArticulatorNumber) -> ArticulatorSpec {
        let (one, two) = match number {
            ArticulatorNumber::One => (true, false),
            ArticulatorNumber::Two => (false, true),
            ArticulatorNumber::Both => (true, true),
        };
        ArticulatorSpec {
            articulator,
            one,
            two,
        }
    }

    /// `None` when neither instance is selected.
    pub fn number(&self) -> Option<ArticulatorNumber> {
        match (self.one, self.two) {
            (true, true) => Some(ArticulatorNumber::Both),
            (true, false) => Some(ArticulatorNumber::One),
            (false, true) => Some(ArticulatorNumber::Two),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    #[default]
    Unchecked,
    PartiallyChecked,
    Checked,
}

impl CheckState {
    pub fn is_selected(self) -> bool {
        !matches!(self, CheckState::Unchecked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureNode {
    pub label: String,
    #[serde(default)]
    pub state: CheckState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FeatureNode>,
}

impl FeatureNode {
    pub fn new(label: impl Into<String>) -> FeatureNode {
        FeatureNode {
            label: label.into(),
            state: CheckState::Unchecked,
            children: Vec::new(),
        }
    }

    fn child(&self, label: &str) -> Option<&FeatureNode> {
        self.children.iter().find(|c| c.label == label)
    }

    fn child_mut_or_insert(&mut self, label: &str) -> &mut FeatureNode {
        let pos = match self.children.iter().position(|c| c.label == label) {
            Some(pos) => pos,
            None => {
                self.children.push(FeatureNode::new(label));
                self.children.len() - 1
            }
        };
        &mut self.children[pos]
    }
}

/// A read-only tree of labelled nodes, each checked, partially checked, or unchecked.
///
/// Movement and location content is queried through this tree only: the matchers ask
/// which children of a node are selected, one level at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureTree {
    #[serde(default)]
    pub roots: Vec<FeatureNode>,
}

impl FeatureTree {
    pub fn new() -> FeatureTree {
        FeatureTree::default()
    }

    /// Builds a tree in which every node on each path is selected. Intermediate nodes
    /// are partially checked and the last node of each path is checked.
    pub fn from_checked_paths<P, S>(paths: P) -> FeatureTree
    where
        P: IntoIterator,
        P::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = FeatureTree::new();
        for path in paths {
            tree.check_path(path);
        }
        tree
    }

    pub fn check_path<I, S>(&mut self, path: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<S> = path.into_iter().collect();
        let Some((first, rest)) = labels.split_first() else {
            return;
        };

        let pos = match self.roots.iter().position(|r| r.label == first.as_ref()) {
            Some(pos) => pos,
            None => {
                self.roots.push(FeatureNode::new(first.as_ref()));
                self.roots.len() - 1
            }
        };

        let mut node = &mut self.roots[pos];
        for label in rest {
            if node.state != CheckState::Checked {
                node.state = CheckState::PartiallyChecked;
            }
            node = node.child_mut_or_insert(label.as_ref());
        }
        node.state = CheckState::Checked;
    }

    /// Labels of the selected children directly beneath the node at `path`.
    ///
    /// An empty path addresses the top level. A path that does not lead to a selected
    /// node yields an empty set.
    pub fn checked_child_labels(&self, path: &[&str]) -> BTreeSet<String> {
        let children = match path.split_first() {
            None => &self.roots,
            Some((first, rest)) => {
                let Some(mut node) = self.roots.iter().find(|r| r.label == *first) else {
                    return BTreeSet::new();
                };
                for label in rest {
                    match node.child(label) {
                        Some(next) => node = next,
                        None => return BTreeSet::new(),
                    }
                }
                if !node.state.is_selected() {
                    return BTreeSet::new();
                }
                &node.children
            }
        };

        children
            .iter()
            .filter(|c| c.state.is_selected())
            .map(|c| c.label.clone())
            .collect()
    }
}

pub const MOVEMENT_TYPE_NODE: &str = "Movement type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    PerceptualShape,
    JointSpecific,
    HandshapeChange,
}

impl MovementType {
    pub const ALL: [MovementType; 3] = [
        MovementType::PerceptualShape,
        MovementType::JointSpecific,
        MovementType::HandshapeChange,
    ];

    /// Label of the movement-type node in a movement tree.
    pub fn label(self) -> &'static str {
        match self {
            MovementType::PerceptualShape => "Perceptual shape",
            MovementType::JointSpecific => "Joint-specific movements",
            MovementType::HandshapeChange => "Handshape change",
        }
    }

    pub fn from_label(label: &str) -> Option<MovementType> {
        MovementType::ALL.into_iter().find(|t| t.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Body,
    BodyAnchored,
    PurelySpatial,
    SigningSpaceOnly,
}

impl LocationType {
    pub fn is_body_based(self) -> bool {
        matches!(self, LocationType::Body | LocationType::BodyAnchored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
    Sagittal,
}

/// Selection on one axis of an orientation direction.
///
/// `AxisOnly` records that the axis was chosen without committing to either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisChoice {
    Ipsi,
    Contra,
    Up,
    Down,
    Distal,
    Proximal,
    AxisOnly,
}

impl AxisChoice {
    /// The axis this choice belongs to; `None` for `AxisOnly`, which fits any axis.
    pub fn axis(self) -> Option<Axis> {
        match self {
            AxisChoice::Ipsi | AxisChoice::Contra => Some(Axis::Horizontal),
            AxisChoice::Up | AxisChoice::Down => Some(Axis::Vertical),
            AxisChoice::Distal | AxisChoice::Proximal => Some(Axis::Sagittal),
            AxisChoice::AxisOnly => None,
        }
    }
}

/// A direction as an ordered (horizontal, vertical, sagittal) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Direction {
    #[serde(default)]
    pub horizontal: Option<AxisChoice>,
    #[serde(default)]
    pub vertical: Option<AxisChoice>,
    #[serde(default)]
    pub sagittal: Option<AxisChoice>,
}

impl Direction {
    pub fn new(
        horizontal: Option<AxisChoice>,
        vertical: Option<AxisChoice>,
        sagittal: Option<AxisChoice>,
    ) -> Direction {
        Direction {
            horizontal,
            vertical,
            sagittal,
        }
    }

    /// The selected components, in axis order.
    pub fn components(&self) -> impl Iterator<Item = (Axis, AxisChoice)> + '_ {
        [
            (Axis::Horizontal, self.horizontal),
            (Axis::Vertical, self.vertical),
            (Axis::Sagittal, self.sagittal),
        ]
        .into_iter()
        .filter_map(|(axis, choice)| choice.map(|c| (axis, c)))
    }

    pub fn component(&self, axis: Axis) -> Option<AxisChoice> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
            Axis::Sagittal => self.sagittal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    fn is_well_formed(&self) -> bool {
        self.components()
            .all(|(axis, choice)| choice.axis().is_none_or(|a| a == axis))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationContent {
    #[serde(default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub tree: FeatureTree,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrientationContent {
    #[serde(default)]
    pub palm: Direction,
    #[serde(default)]
    pub root: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandConfigurationContent {
    /// Field-by-field transcription as coded.
    #[serde(default)]
    pub transcription: Vec<String>,
    /// The `overall options / forearm` flag.
    #[serde(default)]
    pub forearm: bool,
}

/// Kind-specific module content. The variant fixes the module's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleContent {
    SignType(FeatureTree),
    Movement(FeatureTree),
    Location(LocationContent),
    Relation(FeatureTree),
    Orientation(OrientationContent),
    HandConfiguration(HandConfigurationContent),
    NonManual(FeatureTree),
}

impl ModuleContent {
    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleContent::SignType(_) => ModuleKind::SignType,
            ModuleContent::Movement(_) => ModuleKind::Movement,
            ModuleContent::Location(_) => ModuleKind::Location,
            ModuleContent::Relation(_) => ModuleKind::Relation,
            ModuleContent::Orientation(_) => ModuleKind::Orientation,
            ModuleContent::HandConfiguration(_) => ModuleKind::HandConfiguration,
            ModuleContent::NonManual(_) => ModuleKind::NonManual,
        }
    }
}

/// One annotation unit attached to a sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articulators: Option<ArticulatorSpec>,
    pub content: ModuleContent,
}

impl Module {
    pub fn new(id: impl Into<ModuleId>, content: ModuleContent) -> Module {
        Module {
            id: id.into(),
            articulators: None,
            content,
        }
    }

    pub fn with_articulators(
        mut self,
        articulator: Articulator,
        number: ArticulatorNumber,
    ) -> Module {
        self.articulators = Some(ArticulatorSpec::new(articulator, number));
        self
    }

    pub fn kind(&self) -> ModuleKind {
        self.content.kind()
    }

    pub fn movement_tree(&self) -> Option<&FeatureTree> {
        match &self.content {
            ModuleContent::Movement(tree) => Some(tree),
            _ => None,
        }
    }

    /// The single selected movement type, if exactly one is selected.
    pub fn movement_type(&self) -> Option<MovementType> {
        let labels = self.movement_tree()?.checked_child_labels(&[MOVEMENT_TYPE_NODE]);
        if labels.len() != 1 {
            return None;
        }
        labels.iter().next().and_then(|l| MovementType::from_label(l))
    }

    pub fn location_tree(&self) -> Option<&FeatureTree> {
        match &self.content {
            ModuleContent::Location(loc) => Some(&loc.tree),
            _ => None,
        }
    }

    pub fn location_type(&self) -> Option<LocationType> {
        match &self.content {
            ModuleContent::Location(loc) => loc.location_type,
            _ => None,
        }
    }

    pub fn palm_direction(&self) -> Option<&Direction> {
        match &self.content {
            ModuleContent::Orientation(o) => Some(&o.palm),
            _ => None,
        }
    }

    pub fn root_direction(&self) -> Option<&Direction> {
        match &self.content {
            ModuleContent::Orientation(o) => Some(&o.root),
            _ => None,
        }
    }

    pub fn transcription(&self) -> Option<&[String]> {
        match &self.content {
            ModuleContent::HandConfiguration(hc) => Some(&hc.transcription),
            _ => None,
        }
    }

    pub fn forearm(&self) -> Option<bool> {
        match &self.content {
            ModuleContent::HandConfiguration(hc) => Some(hc.forearm),
            _ => None,
        }
    }
}

/// An annotated sign: a gloss, an optional sign-type module, and its other modules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sign {
    #[serde(default)]
    pub gloss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_type: Option<Module>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Sign {
    pub fn new(gloss: impl Into<String>) -> Sign {
        Sign {
            gloss: gloss.into(),
            sign_type: None,
            modules: Vec::new(),
        }
    }

    pub fn with_sign_type(mut self, module: Module) -> Sign {
        self.sign_type = Some(module);
        self
    }

    pub fn with_module(mut self, module: Module) -> Sign {
        self.modules.push(module);
        self
    }

    pub fn sign_type(&self) -> Option<&Module> {
        self.sign_type.as_ref()
    }

    /// Modules of `kind`, in stored order. Sign type is held separately and never
    /// returned here.
    pub fn modules_of_kind(&self, kind: ModuleKind) -> Vec<&Module> {
        self.modules.iter().filter(|m| m.kind() == kind).collect()
    }

    pub fn validate(&self) -> Result<(), AlignError> {
        let invalid = |message: String| AlignError::InvalidSign {
            gloss: self.gloss.clone(),
            message,
        };

        if let Some(st) = &self.sign_type {
            if st.kind() != ModuleKind::SignType {
                return Err(invalid(format!(
                    "sign type slot holds a {} module ({})",
                    st.kind(),
                    st.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for module in self.sign_type.iter().chain(self.modules.iter()) {
            if !module.id.0.is_finite() {
                return Err(invalid(format!("module id {} is not finite", module.id)));
            }
            if !seen.insert(module.id) {
                return Err(invalid(format!("duplicate module id {}", module.id)));
            }
        }

        for module in &self.modules {
            match &module.content {
                ModuleContent::SignType(_) => {
                    return Err(invalid(format!(
                        "sign type module {} stored among regular modules",
                        module.id
                    )));
                }
                ModuleContent::Orientation(o) => {
                    if !o.palm.is_well_formed() || !o.root.is_well_formed() {
                        return Err(invalid(format!(
                            "orientation module {} has a direction choice on the wrong axis",
                            module.id
                        )));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}
