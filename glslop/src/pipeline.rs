//! Multi-stage shader program synthesis

use std::collections::BTreeMap;
use std::fmt;

use crate::names::NameAllocator;
use crate::shader::StageBuilder;
use crate::signal::{Provenance, Signal, SignalSet, Synthetic};
use crate::stage::Stage;
use crate::types::{TypeDesc, TypeInfo};

mod compare;

mod route;
pub use route::Direction;

/// Synthesizer for a complete shader program over a subset of the pipeline stages
///
/// Signals are declared once, then routed from the stage where they are produced to the stage
/// where they are consumed. Stages in between get pass-through code, and every generated
/// identifier is unique across the whole program.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Target GLSL version
    version: u32,
    /// Builders for the present stages
    stages: BTreeMap<Stage, StageBuilder>,
    /// Identifiers used anywhere in the program
    names: NameAllocator,
    /// Inputs of the program, as seen from outside
    inputs: SignalSet,
    /// Outputs of the program, as seen from outside
    outputs: SignalSet,
    /// Uniforms of the program
    uniforms: SignalSet,
    /// Geometry stage loop counter
    iterator: Signal,
}

impl Pipeline {
    /// Create a new pipeline
    ///
    /// # Parameters
    ///
    /// * `version`: target GLSL version
    /// * `stages`: stages present in the program, duplicates are ignored
    /// * `inputs`: inputs of the test signature, their names are reserved
    /// * `outputs`: outputs of the test signature, their names are reserved
    pub fn new(
        version: u32,
        stages: impl IntoIterator<Item = Stage>,
        inputs: &SignalSet,
        outputs: &SignalSet,
    ) -> Self {
        let mut this = Self {
            version,
            stages: BTreeMap::new(),
            names: NameAllocator::new(),
            inputs: SignalSet::new(),
            outputs: SignalSet::new(),
            uniforms: SignalSet::new(),
            iterator: Signal::new(Provenance::Unused, TypeInfo::int(), "unused"),
        };

        this.reserve(inputs);
        this.reserve(outputs);

        for stage in stages {
            if this.stages.contains_key(&stage) {
                continue;
            }

            let builder = if stage == Stage::Geometry {
                this.iterator = this.make_unique(
                    Provenance::Synthetic(Synthetic::GeomIterator),
                    TypeInfo::int(),
                    "i",
                );
                StageBuilder::geometry(this.iterator.clone())
            } else {
                StageBuilder::new(stage)
            };

            debug!("adding {} stage", stage);
            this.stages.insert(stage, builder);
        }

        this
    }

    /// Target GLSL version
    pub fn version(&self) -> u32 {
        self.version
    }

    /// `true` if `stage` is part of this pipeline
    pub fn is_present(&self, stage: Stage) -> bool {
        self.stages.contains_key(&stage)
    }

    /// Iterate over the present stages, in pipeline order
    pub fn stages(&self) -> impl DoubleEndedIterator<Item = Stage> + '_ {
        self.stages.keys().copied()
    }

    /// Builder for a present stage
    ///
    /// # Panics
    ///
    /// Panics if `stage` is not present.
    pub fn stage(&self, stage: Stage) -> &StageBuilder {
        self.stages
            .get(&stage)
            .unwrap_or_else(|| panic!("{} stage is not part of the pipeline", stage))
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut StageBuilder {
        self.stages
            .get_mut(&stage)
            .unwrap_or_else(|| panic!("{} stage is not part of the pipeline", stage))
    }

    /// First present stage after `stage`
    pub fn next_stage(&self, stage: Stage) -> Option<Stage> {
        self.stages().find(|s| *s > stage)
    }

    /// Last present stage before `stage`
    pub fn previous_stage(&self, stage: Stage) -> Option<Stage> {
        self.stages().rev().find(|s| *s < stage)
    }

    /// Last present stage that runs before rasterization
    pub fn last_non_fragment_stage(&self) -> Option<Stage> {
        self.stages().rev().find(|s| *s != Stage::Fragment)
    }

    /// Identifiers used so far
    pub fn names(&self) -> &NameAllocator {
        &self.names
    }

    /// Inputs of the program, to be fed with vertex attributes
    pub fn inputs(&self) -> &SignalSet {
        &self.inputs
    }

    /// Outputs of the program, exposed by its last stage
    ///
    /// Before GLSL 1.30 a fragment stage exposes at most one output, through `gl_FragColor`.
    pub fn outputs(&self) -> &SignalSet {
        &self.outputs
    }

    /// Uniforms of the program
    pub fn uniforms(&self) -> &SignalSet {
        &self.uniforms
    }

    /// Loop counter of the geometry stage, if there is one
    pub fn iterator(&self) -> Option<&Signal> {
        if self.iterator.provenance == Provenance::Unused {
            None
        } else {
            Some(&self.iterator)
        }
    }

    /// Reserve the names of `signals`, so no generated identifier collides with them
    pub fn reserve(&mut self, signals: &SignalSet) {
        for signal in signals {
            self.names.reserve(&signal.name);
        }
    }

    /// Create a signal with a fresh name derived from `hint`
    pub fn make_unique(
        &mut self,
        provenance: Provenance,
        ty: impl Into<TypeDesc>,
        hint: &str,
    ) -> Signal {
        let name = self.names.allocate(hint);
        Signal::with_hint(provenance, ty, name, hint)
    }

    /// Create fresh signals with the same types, hints and provenances as `signals`
    pub fn parallel_signals(&mut self, signals: &SignalSet) -> SignalSet {
        signals
            .iter()
            .map(|s| {
                let name = self.names.allocate(&s.hint);
                Signal::with_hint(s.provenance, s.ty, name, s.hint.clone())
            })
            .collect()
    }

    /// Append statements to the body of `stage`
    pub fn add_snippet(&mut self, stage: Stage, snippet: &str) {
        self.stage_mut(stage).append_body(snippet);
    }

    /// Insert statements at the top of the body of `stage`
    pub fn add_snippet_top(&mut self, stage: Stage, snippet: &str) {
        self.stage_mut(stage).prepend_body(snippet);
    }

    /// Declare `locals` at the top of main() in `stage`
    pub fn add_locals(&mut self, stage: Stage, locals: &SignalSet) {
        self.stage_mut(stage).add_locals(locals);
    }

    /// Render the source of a present stage
    pub fn shader(&self, stage: Stage) -> String {
        self.stage(stage).render(self.version)
    }

    /// Render the source of every present stage
    pub fn sources(&self) -> BTreeMap<Stage, String> {
        self.stages
            .iter()
            .map(|(stage, builder)| (*stage, builder.render(self.version)))
            .collect()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stage, source) in self.sources() {
            writeln!(f, "[{} shader]", stage)?;
            writeln!(f, "{}", source)?;
        }

        Ok(())
    }
}
