//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use sign_align::{
    AlignmentPair, Articulator, ArticulatorNumber, AxisChoice, Direction, FeatureTree,
    HandConfigurationContent, LocationContent, LocationType, MOVEMENT_TYPE_NODE, Module,
    ModuleContent, ModuleId, ModuleKind, OrientationContent, Sign,
};

pub type IdPair = (Option<ModuleId>, Option<ModuleId>);

pub fn movement(id: f64, paths: &[&[&str]]) -> Module {
    Module::new(
        id,
        ModuleContent::Movement(FeatureTree::from_checked_paths(
            paths.iter().map(|p| p.iter().copied()),
        )),
    )
}

/// A perceptual-shape movement with a single shape, on hand 1.
pub fn shape_movement(id: f64, shape: &str) -> Module {
    movement(
        id,
        &[&[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", shape][..]],
    )
    .with_articulators(Articulator::Hand, ArticulatorNumber::One)
}

pub fn location(id: f64, location_type: Option<LocationType>, paths: &[&[&str]]) -> Module {
    Module::new(
        id,
        ModuleContent::Location(LocationContent {
            location_type,
            tree: FeatureTree::from_checked_paths(paths.iter().map(|p| p.iter().copied())),
        }),
    )
    .with_articulators(Articulator::Hand, ArticulatorNumber::One)
}

pub fn direction(
    horizontal: Option<AxisChoice>,
    vertical: Option<AxisChoice>,
    sagittal: Option<AxisChoice>,
) -> Direction {
    Direction::new(horizontal, vertical, sagittal)
}

pub fn orientation(id: f64, palm: Direction, root: Direction) -> Module {
    Module::new(id, ModuleContent::Orientation(OrientationContent { palm, root }))
        .with_articulators(Articulator::Hand, ArticulatorNumber::One)
}

/// `transcription` is `|`-separated.
pub fn hand_configuration(id: f64, transcription: &str, forearm: bool) -> Module {
    Module::new(
        id,
        ModuleContent::HandConfiguration(HandConfigurationContent {
            transcription: transcription.split('|').map(str::to_string).collect(),
            forearm,
        }),
    )
    .with_articulators(Articulator::Hand, ArticulatorNumber::One)
}

pub fn relation(id: f64) -> Module {
    Module::new(id, ModuleContent::Relation(FeatureTree::new()))
}

pub fn non_manual(id: f64) -> Module {
    Module::new(id, ModuleContent::NonManual(FeatureTree::new()))
}

pub fn sign_type(id: f64) -> Module {
    Module::new(id, ModuleContent::SignType(FeatureTree::new()))
}

pub fn sign_with(gloss: &str, modules: Vec<Module>) -> Sign {
    modules
        .into_iter()
        .fold(Sign::new(gloss), |sign, module| sign.with_module(module))
}

pub fn id(value: f64) -> Option<ModuleId> {
    Some(ModuleId(value))
}

/// Pair ids, sorted so that comparisons ignore pair order.
pub fn sorted_ids(pairs: &[AlignmentPair<'_>]) -> Vec<IdPair> {
    let mut ids: Vec<IdPair> = pairs.iter().map(|p| p.ids()).collect();
    ids.sort();
    ids
}

pub fn mirrored_ids(pairs: &[AlignmentPair<'_>]) -> Vec<IdPair> {
    let mut ids: Vec<IdPair> = pairs.iter().map(|p| p.swapped().ids()).collect();
    ids.sort();
    ids
}

pub fn ids_of_kind(sign: &Sign, kind: ModuleKind) -> Vec<ModuleId> {
    let mut ids: Vec<ModuleId> = if kind == ModuleKind::SignType {
        sign.sign_type().map(|m| m.id).into_iter().collect()
    } else {
        sign.modules_of_kind(kind).iter().map(|m| m.id).collect()
    };
    ids.sort();
    ids
}

/// A sign carrying every kind, with mixed articulators and content detail.
pub fn rich_sign_a() -> Sign {
    use AxisChoice::*;
    sign_with(
        "HOUSE",
        vec![
            shape_movement(1.0, "Straight"),
            shape_movement(2.0, "Arc"),
            movement(3.0, &[&[MOVEMENT_TYPE_NODE, "Joint-specific movements", "Nodding"][..]])
                .with_articulators(Articulator::Hand, ArticulatorNumber::Both),
            location(4.0, Some(LocationType::Body), &[&["Head", "Forehead"][..]]),
            location(5.0, Some(LocationType::PurelySpatial), &[&["Ipsi side"][..]]),
            location(6.0, Some(LocationType::SigningSpaceOnly), &[]),
            relation(7.0),
            relation(8.0),
            orientation(
                9.0,
                direction(Some(Ipsi), Some(Up), Some(Distal)),
                direction(None, Some(Up), None),
            ),
            orientation(
                10.0,
                direction(None, Some(Down), None),
                direction(Some(Contra), None, None),
            )
            .with_articulators(Articulator::Arm, ArticulatorNumber::Two),
            hand_configuration(11.0, "U|E|E|E|E", false),
            hand_configuration(12.0, "X|b|b|b|b", true),
            hand_configuration(13.0, "Q|Q|Q|Q|Q", false)
                .with_articulators(Articulator::Leg, ArticulatorNumber::One),
            non_manual(14.0),
        ],
    )
    .with_sign_type(sign_type(0.5))
}

pub fn rich_sign_b() -> Sign {
    use AxisChoice::*;
    sign_with(
        "HOME",
        vec![
            shape_movement(21.0, "Arc"),
            movement(22.0, &[&[MOVEMENT_TYPE_NODE, "Handshape change"][..]])
                .with_articulators(Articulator::Arm, ArticulatorNumber::One),
            location(23.0, Some(LocationType::BodyAnchored), &[&["Head", "Cheek"][..]]),
            location(24.0, None, &[]),
            relation(25.0),
            orientation(
                26.0,
                direction(Some(Contra), Some(Up), Some(Distal)),
                direction(None, Some(Up), None),
            )
            .with_articulators(Articulator::Hand, ArticulatorNumber::Both),
            hand_configuration(27.0, "U|H|H|H|H", false),
            hand_configuration(28.0, "O|b|b|b|b", true)
                .with_articulators(Articulator::Hand, ArticulatorNumber::Two),
            non_manual(29.0),
            non_manual(30.0),
        ],
    )
}

/// The same sign with its modules in reverse storage order.
pub fn reversed(sign: &Sign) -> Sign {
    let mut out = sign.clone();
    out.modules.reverse();
    out
}
