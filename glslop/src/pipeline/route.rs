//! Routing of signals across pipeline stages

use super::Pipeline;

use crate::options::InputDelivery;
use crate::shader::Dialect;
use crate::signal::{Provenance, Signal, SignalSet, Synthetic};
use crate::stage::Stage;
use crate::types::TypeInfo;

/// Direction in which values are bridged across stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Values flow toward later stages, the current set is read by each hop
    Forward,
    /// Values are pulled from earlier stages, the current set is written by each hop
    Backward,
}

impl Pipeline {
    /// Present stages strictly between `from` and `to`, in the order they are walked
    fn hops(&self, from: Stage, to: Stage) -> Vec<Stage> {
        from.between(to)
            .filter(|stage| self.is_present(*stage))
            .collect::<Vec<_>>()
    }

    /// Present stages before `stage`, nearest first
    fn hops_before(&self, stage: Stage) -> Vec<Stage> {
        self.stages().rev().filter(|s| *s < stage).collect()
    }

    /// Present stages after `stage`, nearest first
    fn hops_after(&self, stage: Stage) -> Vec<Stage> {
        self.stages().filter(|s| *s > stage).collect()
    }

    /// Bridge `signals` through every stage of `hops`
    ///
    /// Each hop gets a fresh parallel set. Going forward, a hop reads the current set and writes
    /// the fresh one. Going backward, a hop reads the fresh set and writes the current one.
    ///
    /// # Returns
    ///
    /// The set of signals at the far end of the chain.
    fn bridge(&mut self, direction: Direction, hops: Vec<Stage>, signals: &SignalSet) -> SignalSet {
        let mut current = signals.clone();

        for stage in hops {
            let fresh = self.parallel_signals(signals);

            trace!(
                "bridging {:?} through {} stage: {:?} -> {:?}",
                direction,
                stage,
                current.names().collect::<Vec<_>>(),
                fresh.names().collect::<Vec<_>>()
            );

            match direction {
                Direction::Forward => self.copy_data(stage, &current, &fresh),
                Direction::Backward => self.copy_data(stage, &fresh, &current),
            }

            current = fresh;
        }

        current
    }

    /// Declare `inputs` and `outputs` in `stage`, and copy each input to its output
    pub fn copy_data(&mut self, stage: Stage, inputs: &SignalSet, outputs: &SignalSet) {
        self.stage_mut(stage).pass_through(inputs, outputs);
    }

    /// Make `locals` available in the geometry stage from the per-vertex `interstage` inputs
    ///
    /// `locals` are declared at the top of main(), `interstage` as array inputs, and each
    /// local is assigned the element for the current vertex before anything else runs.
    fn fan_in(&mut self, locals: &SignalSet, interstage: &SignalSet) {
        let iterator = self.iterator.name.clone();
        let builder = self.stage_mut(Stage::Geometry);

        builder.add_locals(locals);
        builder.add_inputs(interstage);

        let mut s = String::new();
        for (local, input) in locals.iter().zip(interstage.iter()) {
            s.push_str(&format!("{} = {}[{}];\n", local.name, input.name, iterator));
        }

        builder.prepend_body(&s);
    }

    /// Declare `signals` as arriving in `stage`
    ///
    /// # Returns
    ///
    /// The signals the previous stage has to write: `signals` themselves, or fresh per-vertex
    /// arrays when `stage` is the geometry stage.
    fn receive(&mut self, stage: Stage, signals: &SignalSet) -> SignalSet {
        if stage == Stage::Geometry {
            let interstage = self.parallel_signals(signals);
            self.fan_in(signals, &interstage);
            interstage
        } else {
            self.stage_mut(stage).add_inputs(signals);
            signals.clone()
        }
    }

    /// Route `inputs` from outside the pipeline to `stage`
    ///
    /// The names of `inputs` are the ones visible in `stage`. Earlier stages get pass-through
    /// code, and the signals fed from outside are recorded as the pipeline inputs.
    ///
    /// # Panics
    ///
    /// Panics if `stage` is not present.
    pub fn route_inputs(&mut self, stage: Stage, inputs: &SignalSet) {
        assert!(self.is_present(stage), "{} stage is not present", stage);
        debug!(
            "routing inputs {:?} to {} stage",
            inputs.names().collect::<Vec<_>>(),
            stage
        );

        let interstage = self.receive(stage, inputs);
        let hops = self.hops_before(stage);
        let outer = self.bridge(Direction::Backward, hops, &interstage);
        self.inputs.append(&outer);
    }

    /// Route `inputs` to `stage`, as uniforms or as shader inputs
    pub fn route_inputs_or_uniforms(
        &mut self,
        stage: Stage,
        inputs: &SignalSet,
        delivery: InputDelivery,
    ) {
        match delivery {
            InputDelivery::Uniform => {
                self.stage_mut(stage).add_uniforms(inputs);
                self.uniforms.append(inputs);
            }
            InputDelivery::In => self.route_inputs(stage, inputs),
        }
    }

    /// Route `outputs` of `stage` to the end of the pipeline
    ///
    /// # Returns
    ///
    /// The signals written by the last stage, also recorded as the pipeline outputs. Before
    /// GLSL 1.30 a fragment stage only exposes the first output ever routed to it, the one
    /// written to `gl_FragColor`.
    ///
    /// # Panics
    ///
    /// Panics if `stage` is not present.
    pub fn route_outputs(&mut self, stage: Stage, outputs: &SignalSet) -> SignalSet {
        assert!(self.is_present(stage), "{} stage is not present", stage);
        debug!(
            "routing outputs {:?} from {} stage",
            outputs.names().collect::<Vec<_>>(),
            stage
        );

        self.stage_mut(stage).add_outputs(outputs);

        let hops = self.hops_after(stage);
        let mut outer = self.bridge(Direction::Forward, hops, outputs);

        // A legacy fragment stage only exposes the value written to gl_FragColor
        if self.is_present(Stage::Fragment)
            && Dialect::for_version(self.version) == Dialect::Legacy
        {
            let room = usize::from(self.outputs.is_empty());
            outer = outer.iter().take(room).cloned().collect();
        }

        self.outputs.append(&outer);
        outer
    }

    /// Route `signals` written by `from` so they can be read by `to`
    ///
    /// Adjacent stages share the names of `signals`. When `to` is the geometry stage, the
    /// returned signals are per-iteration locals selected from the array inputs.
    ///
    /// # Returns
    ///
    /// The signals as they are visible in `to`.
    ///
    /// # Panics
    ///
    /// Panics if either stage is not present, or if `to` comes before `from`.
    pub fn route_data(&mut self, from: Stage, to: Stage, signals: &SignalSet) -> SignalSet {
        assert!(self.is_present(from), "{} stage is not present", from);
        assert!(self.is_present(to), "{} stage is not present", to);
        assert!(from <= to, "cannot route data from {} back to {}", from, to);

        if from == to {
            return signals.clone();
        }

        debug!(
            "routing {:?} from {} to {} stage",
            signals.names().collect::<Vec<_>>(),
            from,
            to
        );

        self.stage_mut(from).add_outputs(signals);

        let hops = self.hops(from, to);
        let arriving = self.bridge(Direction::Forward, hops, signals);

        if to == Stage::Geometry {
            let locals = self.parallel_signals(signals);
            self.fan_in(&locals, &arriving);
            locals
        } else {
            self.stage_mut(to).add_inputs(&arriving);
            arriving
        }
    }

    /// Route `signals` between two present stages, `from` being the earlier one
    ///
    /// Going [Forward](Direction::Forward), `signals` are written by `from` and the returned
    /// set is visible in `to`, see [route_data](Self::route_data). Going
    /// [Backward](Direction::Backward), `signals` are read by `to` and the returned set is the
    /// one `from` has to write.
    ///
    /// # Panics
    ///
    /// Panics if either stage is not present, or if `to` comes before `from`.
    pub fn route(
        &mut self,
        direction: Direction,
        from: Stage,
        to: Stage,
        signals: &SignalSet,
    ) -> SignalSet {
        if direction == Direction::Forward {
            return self.route_data(from, to, signals);
        }

        assert!(self.is_present(from), "{} stage is not present", from);
        assert!(self.is_present(to), "{} stage is not present", to);
        assert!(from <= to, "cannot route data from {} back to {}", from, to);

        if from == to {
            return signals.clone();
        }

        debug!(
            "pulling {:?} into {} stage from {} stage",
            signals.names().collect::<Vec<_>>(),
            to,
            from
        );

        let interstage = self.receive(to, signals);
        let hops = self.hops(from, to).into_iter().rev().collect();
        let outer = self.bridge(Direction::Backward, hops, &interstage);
        self.stage_mut(from).add_outputs(&outer);
        outer
    }

    /// Feed `gl_Position` from a vertex attribute
    ///
    /// # Returns
    ///
    /// The position attribute, as seen from outside the pipeline.
    ///
    /// # Panics
    ///
    /// Panics if the pipeline only has a fragment stage.
    pub fn route_position(&mut self) -> Signal {
        let stage = self
            .last_non_fragment_stage()
            .unwrap_or_else(|| panic!("no stage can write gl_Position"));

        let position = self.make_unique(
            Provenance::Synthetic(Synthetic::PositionResult),
            TypeInfo::vec4(),
            "pos",
        );

        self.add_snippet(stage, &format!("gl_Position = {};\n", position.name));

        let positions: SignalSet = std::iter::once(position).collect();
        let first = self.inputs.len();
        self.route_inputs(stage, &positions);
        self.inputs[first].clone()
    }
}
