//! Readiness of the external collaborators that turn a layout into
//! something visible.

use bevy::prelude::*;

/// Polled by the lifecycle every frame; set by the texture and entity
/// collaborators, cleared by regeneration.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneReadiness {
    pub textures: bool,
    pub entities: bool,
}

impl Default for SceneReadiness {
    fn default() -> Self {
        Self {
            textures: true,
            entities: true,
        }
    }
}

impl SceneReadiness {
    /// Both collaborators must rebuild before the scene may be shown.
    pub fn invalidate(&mut self) {
        self.textures = false;
        self.entities = false;
    }

    pub fn mark_textures_ready(&mut self) {
        self.textures = true;
    }

    pub fn mark_entities_ready(&mut self) {
        self.entities = true;
    }

    pub fn is_ready(&self) -> bool {
        self.textures && self.entities
    }
}
