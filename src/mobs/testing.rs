//! Mob test doubles shared by the pool and targeting tests

use glam::Vec2;

use super::{MobAi, MobControllerType, MobDeathType, MobEntity, MobTemplate};
use crate::core::Tick;

#[derive(Debug, Clone, Default)]
pub struct TestAi {
    pub dead: bool,
    pub hp: f32,
    pub boss: bool,
    pub level: u32,
    pub undead: bool,
    pub dazzled: bool,
    pub removed: bool,
    pub death: Option<(Tick, MobDeathType)>,
    pub aggro_range: Option<f32>,
    pub controller: (MobControllerType, u32),
    pub guided_by: Option<u32>,
}

impl MobAi for TestAi {
    fn is_dead(&self) -> bool {
        self.dead
    }

    fn hp_percent(&self) -> f32 {
        self.hp
    }

    fn is_boss(&self) -> bool {
        self.boss
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn is_undead(&self) -> bool {
        self.undead
    }

    fn is_dazzled(&self) -> bool {
        self.dazzled
    }

    fn kill(&mut self, now: Tick, death_type: MobDeathType) {
        self.dead = true;
        self.hp = 0.0;
        self.death = Some((now, death_type));
    }

    fn is_removed(&self) -> bool {
        self.removed
    }

    fn mark_removed(&mut self, _now: Tick) {
        self.removed = true;
    }

    fn set_aggro_range(&mut self, range: f32) {
        self.aggro_range = Some(range);
    }

    fn controller_type(&self) -> MobControllerType {
        self.controller.0
    }

    fn controller_id(&self) -> u32 {
        self.controller.1
    }

    fn change_controller(&mut self, kind: MobControllerType, controller_id: u32, _now: Tick) {
        self.controller = (kind, controller_id);
    }

    fn is_guided_by(&self, target_id: u32) -> bool {
        self.guided_by == Some(target_id)
    }

    fn set_guided(&mut self, target_id: u32) {
        self.guided_by = Some(target_id);
    }

    fn reset_guided(&mut self) {
        self.guided_by = None;
    }
}

#[derive(Debug, Clone)]
pub struct TestMob {
    pub ai: Option<TestAi>,
    pub position: Option<Vec2>,
    pub template: MobTemplate,
    pub frame: Option<Vec2>,
    pub death_animation_done: bool,
}

impl TestMob {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            ai: Some(TestAi {
                hp: 1.0,
                level: 10,
                ..Default::default()
            }),
            position: Some(Vec2::new(x, y)),
            template: MobTemplate::new("0100100", Vec2::new(x, y)),
            frame: None,
            death_animation_done: false,
        }
    }

    pub fn boss(mut self, level: u32, name: &str) -> Self {
        if let Some(ai) = self.ai.as_mut() {
            ai.boss = true;
            ai.level = level;
        }
        self.template.is_boss = true;
        self.template.name = Some(name.to_owned());
        self
    }

    pub fn with_template(mut self, template: MobTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_ai(mut self, edit: impl FnOnce(&mut TestAi)) -> Self {
        if let Some(ai) = self.ai.as_mut() {
            edit(ai);
        }
        self
    }
}

impl MobEntity for TestMob {
    type Ai = TestAi;

    fn ai(&self) -> Option<&TestAi> {
        self.ai.as_ref()
    }

    fn ai_mut(&mut self) -> Option<&mut TestAi> {
        self.ai.as_mut()
    }

    fn position(&self) -> Option<Vec2> {
        self.position
    }

    fn template(&self) -> &MobTemplate {
        &self.template
    }

    fn frame_size(&self) -> Option<Vec2> {
        self.frame
    }

    fn is_death_animation_complete(&self) -> bool {
        self.death_animation_done
    }
}
