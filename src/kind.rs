//! Diagram kinds and the strings that select them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::render::defaults::{self, Composition};
use crate::types::Viewport;

/// Which evaluator/renderer pair a diagram uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Projectile,
    Wave,
    Pendulum,
    Orbit,
    Bar,
    Molecule,
    Circuit,
    Process,
    Graph,
    /// Used for any kind string we don't recognize
    Fallback,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 10] = [
        DiagramKind::Projectile,
        DiagramKind::Wave,
        DiagramKind::Pendulum,
        DiagramKind::Orbit,
        DiagramKind::Bar,
        DiagramKind::Molecule,
        DiagramKind::Circuit,
        DiagramKind::Process,
        DiagramKind::Graph,
        DiagramKind::Fallback,
    ];

    /// Resolve a kind string. Never fails: unknown strings give `Fallback`.
    pub fn parse(s: &str) -> DiagramKind {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "projectile" | "particle" | "projectile-motion" => DiagramKind::Projectile,
            "wave" | "wave-motion" => DiagramKind::Wave,
            "pendulum" => DiagramKind::Pendulum,
            "orbit" | "astronomy" | "solar-system" => DiagramKind::Orbit,
            "bar" | "bar-chart" => DiagramKind::Bar,
            "molecule" | "atom" => DiagramKind::Molecule,
            "circuit" | "circuits" => DiagramKind::Circuit,
            "process" => DiagramKind::Process,
            "graph" | "function" => DiagramKind::Graph,
            _ => DiagramKind::Fallback,
        };
        if kind == DiagramKind::Fallback {
            crate::log::debug!(kind = s, "unrecognized diagram kind, using fallback");
        }
        kind
    }

    pub fn name(self) -> &'static str {
        match self {
            DiagramKind::Projectile => "projectile",
            DiagramKind::Wave => "wave",
            DiagramKind::Pendulum => "pendulum",
            DiagramKind::Orbit => "orbit",
            DiagramKind::Bar => "bar",
            DiagramKind::Molecule => "molecule",
            DiagramKind::Circuit => "circuit",
            DiagramKind::Process => "process",
            DiagramKind::Graph => "graph",
            DiagramKind::Fallback => "fallback",
        }
    }

    /// Title shown when the config doesn't carry one
    pub fn default_title(self) -> &'static str {
        match self {
            DiagramKind::Projectile => "Particle Motion",
            DiagramKind::Wave => "Wave Motion",
            DiagramKind::Pendulum => "Simple Pendulum",
            DiagramKind::Orbit => "Solar System",
            DiagramKind::Bar => "Data",
            DiagramKind::Molecule => "Molecule",
            DiagramKind::Circuit => "Circuit",
            DiagramKind::Process => "Process",
            DiagramKind::Graph => "Function Graph",
            DiagramKind::Fallback => "Visualization",
        }
    }

    pub fn viewport(self) -> Viewport {
        defaults::viewport(self)
    }

    /// Fixed-duration settings for composed (exported) playback
    pub fn composition(self) -> Composition {
        defaults::composition(self)
    }
}

impl FromStr for DiagramKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DiagramKind::parse(s))
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DiagramKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DiagramKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DiagramKind::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        for kind in DiagramKind::ALL {
            assert_eq!(DiagramKind::parse(kind.name()), kind);
        }
    }

    #[test]
    fn parses_backend_aliases() {
        assert_eq!(DiagramKind::parse("particle"), DiagramKind::Projectile);
        assert_eq!(DiagramKind::parse("astronomy"), DiagramKind::Orbit);
        assert_eq!(DiagramKind::parse("atom"), DiagramKind::Molecule);
        assert_eq!(DiagramKind::parse("bar-chart"), DiagramKind::Bar);
        assert_eq!(DiagramKind::parse("function"), DiagramKind::Graph);
        assert_eq!(DiagramKind::parse("  Wave "), DiagramKind::Wave);
    }

    #[test]
    fn unknown_kind_falls_back() {
        assert_eq!(DiagramKind::parse("hologram"), DiagramKind::Fallback);
        assert_eq!(DiagramKind::parse(""), DiagramKind::Fallback);
        assert_eq!("dna-helix".parse::<DiagramKind>(), Ok(DiagramKind::Fallback));
    }

    #[test]
    fn serializes_as_canonical_name() {
        let kind: DiagramKind = serde_json::from_str("\"solar-system\"").unwrap();
        assert_eq!(kind, DiagramKind::Orbit);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"orbit\"");
    }
}
