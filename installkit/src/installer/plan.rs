//! Component order and milestones of the composite install.

use crate::component::{ComponentKind, Platform};
use crate::locale::MessageKey;

/// One step of a composite install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanStep {
    pub component: ComponentKind,
    /// Milestone percentage pushed when the step starts.
    pub milestone: u8,
    pub title: MessageKey,
    pub subtitle: MessageKey,
    pub detail: MessageKey,
    /// Resolve immediately when the component is already installed.
    pub skip_if_installed: bool,
    /// Install into `<folder>/<pretty name>` instead of the default location.
    pub subfolder: bool,
}

impl PlanStep {
    fn runtime(component: ComponentKind, milestone: u8, title: MessageKey, detail: MessageKey) -> Self {
        Self {
            component,
            milestone,
            title,
            subtitle: MessageKey::InstallWindow,
            detail,
            skip_if_installed: true,
            subfolder: false,
        }
    }

    fn game(component: ComponentKind, milestone: u8, title: MessageKey) -> Self {
        Self {
            component,
            milestone,
            title,
            subtitle: MessageKey::DownloadExtract,
            detail: MessageKey::InstallInfo,
            skip_if_installed: false,
            subfolder: true,
        }
    }
}

/// Ordered steps of a composite install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositePlan {
    steps: Vec<PlanStep>,
}

impl CompositePlan {
    /// Milestone of the final "finished" item.
    pub const FINAL_MILESTONE: u8 = 100;

    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    /// Runtimes for the platform, then the game and the client.
    pub fn for_platform(platform: Platform) -> Self {
        let runtimes = match platform {
            Platform::MacOs => [
                PlanStep::runtime(
                    ComponentKind::Sdl,
                    10,
                    MessageKey::InstallSdl,
                    MessageKey::InstallSdlWindow,
                ),
                PlanStep::runtime(
                    ComponentKind::Mono,
                    25,
                    MessageKey::InstallMono,
                    MessageKey::InstallMonoWindow,
                ),
            ],
            Platform::Windows | Platform::Linux => [
                PlanStep::runtime(
                    ComponentKind::OpenAl,
                    10,
                    MessageKey::InstallOpenAl,
                    MessageKey::InstallOpenAlWindow,
                ),
                PlanStep::runtime(
                    ComponentKind::DotNet,
                    25,
                    MessageKey::InstallNet,
                    MessageKey::InstallNetWindow,
                ),
            ],
        };

        let mut steps = runtimes.to_vec();
        steps.push(PlanStep::game(ComponentKind::Tso, 50, MessageKey::InstallTso));
        steps.push(PlanStep::game(ComponentKind::Fso, 75, MessageKey::InstallFso));
        Self { steps }
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
