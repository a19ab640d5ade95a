//! Headless field demo
//!
//! Walks a player across a small map for ten seconds: mobs are killed and
//! drop loot, the player picks it up, a hidden portal fades in and out and a
//! touch reactor goes off. Every pool event is logged as JSON.
//!
//! Usage: `fieldsim [config.ron]`

use std::error::Error;

use fieldsim::prelude::*;
use serde::Serialize;

const FRAME_MS: u64 = 16;
const FRAMES: u64 = 625;
const PLAYER_ID: u32 = 1;
const PLAYER_SPEED: f32 = 120.0;
const ATTACK_RANGE: f32 = 80.0;
const ATTACK_EVERY: u64 = 30;
const DEATH_ANIMATION_MS: u64 = 800;

// ============================================================================
// Demo Entities
// ============================================================================

#[derive(Debug, Default)]
struct DemoAi {
    hp: f32,
    death_time: Option<Tick>,
    removed: bool,
    controller: (MobControllerType, u32),
    guided_by: Option<u32>,
}

impl MobAi for DemoAi {
    fn is_dead(&self) -> bool {
        self.death_time.is_some()
    }

    fn hp_percent(&self) -> f32 {
        self.hp
    }

    fn kill(&mut self, now: Tick, _death_type: MobDeathType) {
        self.hp = 0.0;
        self.death_time = Some(now);
    }

    fn is_removed(&self) -> bool {
        self.removed
    }

    fn mark_removed(&mut self, _now: Tick) {
        self.removed = true;
    }

    fn set_aggro_range(&mut self, _range: f32) {}

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

#[derive(Debug)]
struct DemoMob {
    ai: DemoAi,
    template: MobTemplate,
    now: Tick,
}

impl DemoMob {
    fn from_template(template: MobTemplate) -> Self {
        Self {
            ai: DemoAi {
                hp: 1.0,
                ..Default::default()
            },
            template,
            now: 0,
        }
    }
}

impl MobEntity for DemoMob {
    type Ai = DemoAi;

    fn ai(&self) -> Option<&DemoAi> {
        Some(&self.ai)
    }

    fn ai_mut(&mut self) -> Option<&mut DemoAi> {
        Some(&mut self.ai)
    }

    fn position(&self) -> Option<Vec2> {
        Some(self.template.position)
    }

    fn template(&self) -> &MobTemplate {
        &self.template
    }

    fn is_death_animation_complete(&self) -> bool {
        self.ai
            .death_time
            .is_some_and(|t| self.now.saturating_sub(t) >= DEATH_ANIMATION_MS)
    }
}

struct DemoReactor {
    template: ReactorTemplate,
}

impl ReactorEntity for DemoReactor {
    fn template(&self) -> &ReactorTemplate {
        &self.template
    }

    fn on_state_changed(&mut self, state: ReactorState, now: Tick) {
        log::debug!("Reactor {} -> {state:?} at {now}", self.template.reactor_id);
    }
}

// ============================================================================
// Map
// ============================================================================

fn demo_mobs() -> Vec<DemoMob> {
    [150.0, 300.0, 450.0, 700.0, 950.0]
        .into_iter()
        .map(|x| {
            DemoMob::from_template(
                MobTemplate::new("0100100", Vec2::new(x, 0.0))
                    .with_name("Snail")
                    .with_mob_time(4_000),
            )
        })
        .collect()
}

fn demo_portals() -> Vec<PortalInstance> {
    vec![
        PortalInstance::new("sp", PortalType::StartPoint, Vec2::ZERO),
        PortalInstance::new("secret00", PortalType::Hidden, Vec2::new(520.0, 0.0))
            .with_target(100000001, "sp"),
        PortalInstance::new("east00", PortalType::Visible, Vec2::new(1_200.0, 0.0))
            .with_target(100000002, "west00"),
    ]
}

fn demo_reactors() -> Vec<DemoReactor> {
    vec![DemoReactor {
        template: ReactorTemplate::new("1002000", Vec2::new(800.0, 0.0))
            .with_name("lever")
            .with_hitbox(Vec2::new(15.0, 30.0), Vec2::new(30.0, 30.0))
            .with_reactor_time(3_000),
    }]
}

fn log_events<E: Serialize>(pool: &str, events: impl Iterator<Item = E>) -> Result<(), Box<dyn Error>> {
    for event in events {
        log::info!("[{pool}] {}", serde_json::to_string(&event)?);
    }
    Ok(())
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut drops = DropPool::new(config.drops.clone());
    drops.set_ground_lookup(|_| 0.0);

    let mut mobs = MobPool::new(config.mobs.clone());
    mobs.initialize(demo_mobs());

    let mut portals = PortalPool::new(config.portals.clone());
    portals.initialize(demo_portals());

    let mut reactors = ReactorPool::new(config.reactors.clone());
    reactors.initialize(demo_reactors());

    let mut player = portals
        .find_start_point()
        .and_then(|i| portals.portal(i))
        .map_or(Vec2::ZERO, |p| p.position);
    let loot = [LootEntry::new("2000000", 1), LootEntry::new("1302000", 1).rare()];
    let mut inside_portal = None;
    let mut clock = FrameClock::new();

    for frame in 0..FRAMES {
        let (now, dt) = clock.advance(FRAME_MS);
        player.x += PLAYER_SPEED * dt;

        if frame % ATTACK_EVERY == 0 {
            if let Some(target) = mobs.closest_mob(player, Some(ATTACK_RANGE)) {
                mobs.kill_mob(target, MobDeathType::Killed);
            }
        }

        for id in mobs.dying_mobs().map(|(id, _)| id).collect::<Vec<_>>() {
            if let Some(mob) = mobs.mob_mut(id) {
                mob.now = now;
            }
        }
        mobs.update(now, |point| {
            let mut template =
                MobTemplate::new(point.mob_type.clone(), point.position).with_mob_time(point.respawn_time_ms);
            template.name = point.name.clone();
            Some(DemoMob::from_template(template))
        });

        let died: Vec<_> = mobs.drain_events().collect();
        for event in &died {
            let MobEvent::Died { id } = event else {
                continue;
            };
            if let Some(position) = mobs.mob(*id).and_then(|m| m.position()) {
                drops.spawn_drops_from_mob(position, now, Some(PLAYER_ID), 120, &loot);
            }
        }
        log_events("mobs", died.into_iter())?;

        drops.update(now, dt);
        let pickup_range = drops.config().pickup_range;
        drops.try_pickup_closest(player, PLAYER_ID, now, pickup_range);
        log_events("drops", drops.drain_events())?;

        portals.update(player, now, dt);
        let touching = portals.check_portal_collision(player, None);
        if let Some(index) = touching.filter(|&i| Some(i) != inside_portal) {
            portals.trigger_portal(index);
        }
        inside_portal = touching;
        log_events("portals", portals.drain_events())?;

        for index in reactors.find_touch_reactor_around_local_user(player, None) {
            reactors.activate_reactor(index, PLAYER_ID, now, ReactorActivationType::Touch);
        }
        for index in 0..reactors.reactor_count() {
            if reactors
                .reactor_data(index)
                .is_some_and(|d| d.state == ReactorState::Active)
            {
                reactors.deactivate_reactor(index, now);
            }
        }
        reactors.update(now, dt);
        log_events("reactors", reactors.drain_events())?;
    }

    log::info!(
        "Finished after {} frames: {:?} {:?} {:?} {:?}",
        clock.frame_count(),
        mobs.stats(),
        drops.stats(),
        portals.stats(),
        reactors.stats()
    );
    Ok(())
}
