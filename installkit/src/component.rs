//! Installable components and installer kinds.

use std::fmt;
use std::str::FromStr;

/// A component that can be installed by a single-component pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// OpenAL audio runtime.
    OpenAl,
    /// .NET Framework runtime.
    DotNet,
    /// Mono runtime (macOS replacement for .NET).
    Mono,
    /// SDL2 libraries (macOS replacement for OpenAL).
    Sdl,
    /// The Sims Online game files.
    Tso,
    /// FreeSO client.
    Fso,
    /// Remesh pack for the FreeSO client.
    Remeshes,
}

impl ComponentKind {
    /// Every component, in display order.
    pub const ALL: [ComponentKind; 7] = [
        Self::OpenAl,
        Self::DotNet,
        Self::Mono,
        Self::Sdl,
        Self::Tso,
        Self::Fso,
        Self::Remeshes,
    ];

    /// Short code used as the active-task key.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OpenAl => "OpenAL",
            Self::DotNet => "NET",
            Self::Mono => "Mono",
            Self::Sdl => "SDL",
            Self::Tso => "TSO",
            Self::Fso => "FSO",
            Self::Remeshes => "RMS",
        }
    }

    /// Lowercase identifier used in file names, config keys and CLI arguments.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::OpenAl => "openal",
            Self::DotNet => "net",
            Self::Mono => "mono",
            Self::Sdl => "sdl",
            Self::Tso => "tso",
            Self::Fso => "fso",
            Self::Remeshes => "remeshes",
        }
    }

    /// Human-readable name, also used as the install subfolder name.
    pub fn pretty_name(&self) -> &'static str {
        match self {
            Self::OpenAl => "OpenAL",
            Self::DotNet => ".NET Framework",
            Self::Mono => "Mono",
            Self::Sdl => "SDL2",
            Self::Tso => "The Sims Online",
            Self::Fso => "FreeSO",
            Self::Remeshes => "Remesh Package",
        }
    }

    /// Title of the progress item shown while this component installs.
    ///
    /// The remesh pack names the component it belongs to.
    pub fn progress_title(&self, parent: &str) -> String {
        match self {
            Self::Remeshes => format!("Remesh Pack Download for {}", parent),
            other => format!("{} Download", other.pretty_name()),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComponent(pub String);

impl fmt::Display for UnknownComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component '{}'", self.0)
    }
}

impl std::error::Error for UnknownComponent {}

impl FromStr for ComponentKind {
    type Err = UnknownComponent;

    /// Accepts either the slug or the code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == needle || c.code().to_lowercase() == needle)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

/// Key under which a running pipeline is tracked in the active-task registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// A single-component install.
    Component(ComponentKind),
    /// The composite "complete" install.
    FullInstall,
}

impl TaskKind {
    /// Short code used as the registry key.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Component(c) => c.code(),
            Self::FullInstall => "FULL",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<ComponentKind> for TaskKind {
    fn from(component: ComponentKind) -> Self {
        Self::Component(component)
    }
}

/// Operating system family, used to pick platform-specific components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}
