//! In-shader comparison of snippet outputs against expected values

use super::Pipeline;

use crate::options::Options;
use crate::signal::{Provenance, SignalSet, Synthetic};
use crate::stage::Stage;
use crate::types::TypeInfo;

/// Color written when every comparison succeeds
pub const PASS_COLOR: &str = "vec4(0.0, 1.0, 0.0, 1.0)";

/// Color written when any comparison fails
pub const FAIL_COLOR: &str = "vec4(1.0, 0.0, 0.0, 1.0)";

impl Pipeline {
    /// Check `outputs` against expected values in `stage`, and route the resulting color
    ///
    /// A `tolerance` input and one `expected_*` input per output are generated and delivered
    /// according to `opts.input_delivery`. Floating-point outputs are compared within
    /// tolerance, or exactly when the tolerance is zero. Other outputs are always compared
    /// exactly. Any mismatch turns the result color to [FAIL_COLOR].
    pub fn add_comparison_logic(&mut self, stage: Stage, outputs: &SignalSet, opts: &Options) {
        // TODO: only add the tolerance when there is a floating-point output
        let tolerance = self.make_unique(
            Provenance::Synthetic(Synthetic::Tolerance),
            TypeInfo::float(),
            "tolerance",
        );
        let result = self.make_unique(
            Provenance::Synthetic(Synthetic::ColorResult),
            TypeInfo::vec4(),
            "color",
        );

        let mut comparison_inputs = SignalSet::new();
        comparison_inputs.push(tolerance.clone());

        let mut s = String::new();
        s.push_str(&format!("{} = {};\n", result.name, PASS_COLOR));

        for actual in outputs {
            let expected = self.make_unique(
                actual.provenance,
                actual.ty,
                &format!("expected_{}", actual.name),
            );

            if actual.is_floating() {
                s.push_str(&format!("if ({} == 0.0) {{\n", tolerance.name));
                s.push_str(&format!("   if ({} != {})\n", actual.name, expected.name));
                s.push_str(&format!("      {} = {};\n", result.name, FAIL_COLOR));
                s.push_str("} else {\n");
                s.push_str(&format!(
                    "   if (distance({}, {}) > {})\n",
                    actual.name, expected.name, tolerance.name
                ));
                s.push_str(&format!("      {} = {};\n", result.name, FAIL_COLOR));
                s.push_str("}\n");
            } else {
                s.push_str(&format!("if ({} != {})\n", actual.name, expected.name));
                s.push_str(&format!("   {} = {};\n", result.name, FAIL_COLOR));
            }

            comparison_inputs.push(expected);
        }

        debug!(
            "comparing {:?} in {} stage",
            outputs.names().collect::<Vec<_>>(),
            stage
        );

        self.add_snippet(stage, &s);

        let comparison_outputs: SignalSet = std::iter::once(result).collect();
        self.route_outputs(stage, &comparison_outputs);
        self.route_inputs_or_uniforms(stage, &comparison_inputs, opts.input_delivery);
    }
}
