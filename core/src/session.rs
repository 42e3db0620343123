use crate::config::AlignConfig;
use crate::engine::{self, SignAlignment};
use crate::error::AlignError;
use crate::handshape::HandshapeTable;
use crate::model::{ModuleKind, Sign};
use crate::residue::AlignmentPair;

/// Holds state shared across alignment calls, currently the handshape table.
#[derive(Debug, Clone)]
pub struct AlignSession {
    pub handshapes: HandshapeTable,
}

impl Default for AlignSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignSession {
    /// A session using the predefined handshape table.
    pub fn new() -> Self {
        Self {
            handshapes: HandshapeTable::predefined().clone(),
        }
    }

    pub fn with_handshapes(handshapes: HandshapeTable) -> Self {
        Self { handshapes }
    }

    pub fn handshapes(&self) -> &HandshapeTable {
        &self.handshapes
    }

    pub fn handshapes_mut(&mut self) -> &mut HandshapeTable {
        &mut self.handshapes
    }

    pub fn align_modules<'a>(
        &self,
        sign1: &'a Sign,
        sign2: &'a Sign,
        kind: ModuleKind,
        config: &AlignConfig,
    ) -> Vec<AlignmentPair<'a>> {
        engine::align_modules(sign1, sign2, kind, config, &self.handshapes)
    }

    pub fn try_align_modules<'a>(
        &self,
        sign1: &'a Sign,
        sign2: &'a Sign,
        kind: ModuleKind,
        config: &AlignConfig,
    ) -> Result<Vec<AlignmentPair<'a>>, AlignError> {
        engine::try_align_modules(sign1, sign2, kind, config, &self.handshapes)
    }

    pub fn align_signs<'a>(
        &self,
        sign1: &'a Sign,
        sign2: &'a Sign,
        config: &AlignConfig,
    ) -> SignAlignment<'a> {
        engine::align_signs(sign1, sign2, config, &self.handshapes)
    }

    pub fn try_align_signs<'a>(
        &self,
        sign1: &'a Sign,
        sign2: &'a Sign,
        config: &AlignConfig,
    ) -> Result<SignAlignment<'a>, AlignError> {
        engine::try_align_signs(sign1, sign2, config, &self.handshapes)
    }

    /// Aligns many independent sign pairs. Results keep the input order.
    ///
    /// With the `parallel` feature the pairs are spread over the rayon thread pool;
    /// each pair is still aligned single-threaded, so output does not depend on the
    /// number of threads.
    pub fn align_many<'a>(
        &self,
        pairs: &'a [(Sign, Sign)],
        config: &AlignConfig,
    ) -> Vec<SignAlignment<'a>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            pairs
                .par_iter()
                .map(|(s1, s2)| self.align_signs(s1, s2, config))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            pairs
                .iter()
                .map(|(s1, s2)| self.align_signs(s1, s2, config))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Articulator, ArticulatorNumber, HandConfigurationContent, Module, ModuleContent,
    };

    fn hand(id: f64, fields: &[&str]) -> Module {
        Module::new(
            id,
            ModuleContent::HandConfiguration(HandConfigurationContent {
                transcription: fields.iter().map(|f| f.to_string()).collect(),
                forearm: false,
            }),
        )
        .with_articulators(Articulator::Hand, ArticulatorNumber::One)
    }

    #[test]
    fn custom_table_changes_handshape_resolution() {
        // Unknown transcriptions only meet at the forearm stage, in coding order.
        let s1 = Sign::new("a")
            .with_module(hand(1.0, &["Q", "Q"]))
            .with_module(hand(2.0, &["R", "R"]));
        let s2 = Sign::new("b")
            .with_module(hand(3.0, &["R", "R"]))
            .with_module(hand(4.0, &["Q", "Q"]));
        let config = AlignConfig::strict();

        let predefined = AlignSession::new();
        let mut ids: Vec<_> = predefined
            .align_modules(&s1, &s2, ModuleKind::HandConfiguration, &config)
            .iter()
            .map(|p| p.ids())
            .collect();
        ids.sort_by_key(|(l, r)| (*l, *r));
        assert_eq!(ids[0].1.map(|id| id.0), Some(3.0));

        let mut session = AlignSession::with_handshapes(HandshapeTable::new());
        session.handshapes_mut().insert("Q|Q", "A");
        session.handshapes_mut().insert("R|R", "B");
        let mut ids: Vec<_> = session
            .align_modules(&s1, &s2, ModuleKind::HandConfiguration, &config)
            .iter()
            .map(|p| p.ids())
            .collect();
        ids.sort_by_key(|(l, r)| (*l, *r));
        assert_eq!(ids[0].1.map(|id| id.0), Some(4.0));
        assert_eq!(ids[1].1.map(|id| id.0), Some(3.0));
    }

    #[test]
    fn align_many_keeps_input_order() {
        let pairs = vec![
            (Sign::new("one"), Sign::new("uno")),
            (Sign::new("two"), Sign::new("dos")),
        ];
        let session = AlignSession::new();
        let results = session.align_many(&pairs, &AlignConfig::default());
        let glosses: Vec<_> = results.iter().map(|r| (r.gloss1, r.gloss2)).collect();
        assert_eq!(glosses, vec![("one", "uno"), ("two", "dos")]);
    }
}
