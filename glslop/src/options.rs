//! Test configuration options

use std::fmt;
use std::str::FromStr;

use derive_builder::Builder;

use crate::stage::Stage;
use crate::Error;

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// All possible values, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Name of this value on the command line
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| Error::unknown_option($kind, s))
            }
        }
    };
}

option_enum! {
    /// How the test inputs are delivered to the snippet
    InputDelivery("input delivery") {
        /// Through uniforms
        Uniform => "uniform",
        /// Through shader inputs, fed by vertex attributes
        In => "in",
    }
}

option_enum! {
    /// What is done with the outputs of the snippet
    OutputAction("output action") {
        /// Checked against the expected values right after the snippet
        Compare => "compare",
        /// Written to shader outputs
        Out => "out",
        /// Written to shader outputs and checked in the fragment shader
        Hybrid => "hybrid",
    }
}

option_enum! {
    /// How results are delivered back to the CPU
    OutputDelivery("output delivery") {
        /// Captured with transform feedback
        Xfb => "xfb",
        /// Rendered to a color buffer
        Color => "color",
    }
}

impl Default for InputDelivery {
    fn default() -> Self {
        Self::Uniform
    }
}

impl Default for OutputAction {
    fn default() -> Self {
        Self::Compare
    }
}

impl Default for OutputDelivery {
    fn default() -> Self {
        Self::Color
    }
}

/// One way of running a test snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Builder)]
pub struct Options {
    /// Stage running the snippet
    #[builder(default = "Stage::Vertex")]
    pub stage: Stage,
    /// How the inputs reach the snippet
    #[builder(default)]
    pub input_delivery: InputDelivery,
    /// What happens to the outputs of the snippet
    #[builder(default)]
    pub output_action: OutputAction,
    /// How the results reach the CPU
    #[builder(default)]
    pub output_delivery: OutputDelivery,
}

impl Options {
    /// Create a builder for test options
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Enumerate every combination of options
    pub fn all() -> impl Iterator<Item = Options> {
        Stage::ALL.iter().flat_map(|&stage| {
            InputDelivery::ALL.iter().flat_map(move |&input_delivery| {
                OutputAction::ALL.iter().flat_map(move |&output_action| {
                    OutputDelivery::ALL.iter().map(move |&output_delivery| Options {
                        stage,
                        input_delivery,
                        output_action,
                        output_delivery,
                    })
                })
            })
        })
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.stage.short_name(),
            self.input_delivery,
            self.output_action,
            self.output_delivery
        )
    }
}
