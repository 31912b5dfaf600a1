//! The tick scheduler and the host-facing surface of the simulation.

use std::collections::BTreeMap;

use sim_bt::{BehaviorTree, BtStatus, BuildError, ScriptRegistry};
use sim_core::{Id, SimError, SimResult, SymbolTable, TickContext};
use sim_nav::{Direction, GridIndex, NavGridView, TileGrid};

use crate::agent::Role;
use crate::brain::Brain;
use crate::catalog::{BehaviorId, Catalog};
use crate::config::SimConfig;
use crate::object::ObjectSpec;
use crate::scripts;
use crate::snapshot::AgentSnapshot;
use crate::world::{Offer, World};

/// Owns the world, one brain per agent and the script registry.
///
/// `tick` advances decisions by one discrete step; `update` integrates movement over wall time.
/// Hosts usually call [`Simulation::step`], which does both.
pub struct Simulation {
    symbols: SymbolTable,
    registry: ScriptRegistry<World>,
    world: World,
    brains: BTreeMap<Id, Brain>,
    tick: u64,
}

impl Simulation {
    pub fn new(config: SimConfig, grid: TileGrid) -> SimResult<Self> {
        Self::with_scripts(config, grid, |_| Ok(()))
    }

    /// Like [`Simulation::new`], with extra scripts registered after the built-in ones (so they
    /// may reference them).
    pub fn with_scripts<F>(config: SimConfig, grid: TileGrid, extra: F) -> SimResult<Self>
    where
        F: FnOnce(&mut ScriptRegistry<World>) -> Result<(), BuildError>,
    {
        let mut registry = ScriptRegistry::new();
        scripts::register_all(&mut registry, &config)
            .and_then(|()| extra(&mut registry))
            .map_err(|err| SimError::Config(err.to_string()))?;

        let mut symbols = SymbolTable::new();
        let catalog = Catalog::build(&config, &mut symbols, &registry)?;
        let (w, h, d) = grid.dimensions();
        tracing::info!(
            width = w,
            height = h,
            depth = d,
            scripts = registry.len(),
            seed = config.seed,
            "simulation created"
        );

        Ok(Self {
            symbols,
            registry,
            world: World::new(grid, catalog, config),
            brains: BTreeMap::new(),
            tick: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for hosts; claims and racks stay consistent only through `World`'s
    /// own methods.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn registry(&self) -> &ScriptRegistry<World> {
        &self.registry
    }

    pub fn brain(&self, agent: Id) -> Option<&Brain> {
        self.brains.get(&agent)
    }

    pub fn agent_ids(&self) -> Vec<Id> {
        self.brains.keys().copied().collect()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    fn context(&self) -> TickContext {
        let config = self.world.config();
        TickContext::new(self.tick, config.tick_seconds, config.seed)
    }

    // Scheduling -------------------------------------------------------------

    /// One decision step for every agent, in id order, then despawn agents that left.
    pub fn tick(&mut self) {
        let ctx = self.context();
        let offers = self.world.advertised();
        for agent in self.agent_ids() {
            self.run_agent(&ctx, agent, &offers);
        }
        self.despawn_departed();
        self.tick += 1;
    }

    /// One decision step for a single agent. The tick counter does not advance.
    pub fn tick_agent(&mut self, agent: Id) -> SimResult<Option<BtStatus>> {
        if !self.brains.contains_key(&agent) {
            return Err(SimError::AgentNotFound(agent));
        }
        let ctx = self.context();
        let offers = self.world.advertised();
        Ok(self.run_agent(&ctx, agent, &offers))
    }

    fn run_agent(&mut self, ctx: &TickContext, agent: Id, offers: &[Offer]) -> Option<BtStatus> {
        let brain = self.brains.get_mut(&agent)?;
        self.world.tick_needs(agent)?;

        if brain.is_idle() {
            if let Some(offer) = brain.choose(&self.world, offers) {
                let behavior = self.world.catalog().behavior(offer.behavior);
                tracing::info!(
                    agent = %agent,
                    behavior = %behavior.name,
                    target = ?offer.object,
                    score = brain.selector().last_best_score(),
                    tick = ctx.tick,
                    "behavior selected"
                );
                let tree = self.registry.instantiate(behavior.script);
                let label = behavior.name.clone();
                brain.add_behavior(
                    ctx,
                    &mut self.world,
                    offer.behavior,
                    label,
                    offer.object,
                    tree,
                );
            }
        }

        brain.tick(ctx, &mut self.world)
    }

    /// Move every agent along its path for `dt_seconds`.
    pub fn update(&mut self, dt_seconds: f32) {
        for agent in self.agent_ids() {
            self.world.advance_agent(agent, dt_seconds);
        }
    }

    /// Returns the number of tiles the agent entered.
    pub fn update_agent(&mut self, agent: Id, dt_seconds: f32) -> SimResult<u32> {
        self.world
            .advance_agent(agent, dt_seconds)
            .ok_or(SimError::AgentNotFound(agent))
    }

    /// `tick`, then `update` over one tick's worth of wall time.
    pub fn step(&mut self) {
        self.tick();
        self.update(self.world.config().tick_seconds);
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    // Agents -------------------------------------------------------------------

    pub fn spawn_agent(&mut self, role: Role, tile: GridIndex) -> SimResult<Id> {
        if !self.world.in_bounds(tile) {
            return Err(SimError::Config(format!("spawn tile {tile} is outside the grid")));
        }
        let id = self.world.insert_agent(role, tile);
        self.brains
            .insert(id, Brain::new(id, self.world.config().trace));
        tracing::info!(agent = %id, ?role, %tile, "agent spawned");
        Ok(id)
    }

    /// Spawn on the first spawn tile of the grid.
    pub fn spawn_at_entrance(&mut self, role: Role) -> SimResult<Id> {
        let tile = self
            .world
            .grid()
            .spawn_tiles()
            .next()
            .ok_or_else(|| SimError::Config("grid has no spawn tile".to_string()))?;
        self.spawn_agent(role, tile)
    }

    /// Terminate every behavior, release all claims, drop carried objects, then remove the agent.
    pub fn despawn_agent(&mut self, agent: Id) -> SimResult<()> {
        let mut brain = self
            .brains
            .remove(&agent)
            .ok_or(SimError::AgentNotFound(agent))?;
        let ctx = self.context();
        brain.terminate_all(&ctx, &mut self.world);
        self.world.release_all_claims(agent);
        self.world.drop_all(agent);
        self.world.remove_agent(agent);
        tracing::info!(agent = %agent, tick = ctx.tick, "agent despawned");
        Ok(())
    }

    fn despawn_departed(&mut self) {
        let departed: Vec<Id> = self
            .world
            .agents()
            .filter(|(_, body)| body.left)
            .map(|(id, _)| id)
            .collect();
        for agent in departed {
            if let Err(err) = self.despawn_agent(agent) {
                tracing::warn!(agent = %agent, %err, "failed to despawn departed agent");
            }
        }
    }

    pub fn agent_snapshot(&self, agent: Id) -> Option<AgentSnapshot> {
        let body = self.world.agent(agent)?;
        let brain = self.brains.get(&agent)?;
        let catalog = self.world.catalog().needs();
        Some(AgentSnapshot {
            id: agent,
            role: body.role,
            tile: body.nav.tile(),
            position: body.nav.position(),
            facing: body.nav.facing(),
            happiness: body.needs.happiness(),
            neediness: body.needs.neediness(),
            needs: catalog
                .iter()
                .map(|(need, def)| (def.name.clone(), body.needs.value(need)))
                .collect(),
            active_behavior: brain.active_label().map(str::to_string),
            behavior_depth: brain.depth(),
            held: body.held.clone(),
            checked_in: body.checked_in,
        })
    }

    // Behaviors ----------------------------------------------------------------

    fn prepare(
        &self,
        name: &str,
        target: Option<Id>,
    ) -> SimResult<(BehaviorId, String, BehaviorTree<World>)> {
        let catalog = self.world.catalog();
        let id = catalog.behavior_id(&self.symbols, name)?;
        if let Some(target) = target {
            if self.world.object(target).is_none() {
                return Err(SimError::ObjectNotFound(target));
            }
        }
        let behavior = catalog.behavior(id);
        Ok((
            id,
            behavior.name.clone(),
            self.registry.instantiate(behavior.script),
        ))
    }

    /// Drop whatever the agent is doing and start `name`.
    pub fn set_behavior(&mut self, agent: Id, name: &str, target: Option<Id>) -> SimResult<()> {
        let (behavior, label, tree) = self.prepare(name, target)?;
        let ctx = self.context();
        let brain = self
            .brains
            .get_mut(&agent)
            .ok_or(SimError::AgentNotFound(agent))?;
        tracing::info!(agent = %agent, behavior = %label, target = ?target, "behavior set");
        brain.set_behavior(&ctx, &mut self.world, behavior, label, target, tree);
        Ok(())
    }

    /// Pause the active behavior and run `name` on top of it.
    pub fn add_behavior(&mut self, agent: Id, name: &str, target: Option<Id>) -> SimResult<()> {
        let (behavior, label, tree) = self.prepare(name, target)?;
        let ctx = self.context();
        let brain = self
            .brains
            .get_mut(&agent)
            .ok_or(SimError::AgentNotFound(agent))?;
        tracing::info!(agent = %agent, behavior = %label, target = ?target, "behavior added");
        brain.add_behavior(&ctx, &mut self.world, behavior, label, target, tree);
        Ok(())
    }

    /// Release the active behavior; the one below it resumes. `false` when the agent was idle.
    pub fn terminate_behavior(&mut self, agent: Id) -> SimResult<bool> {
        let ctx = self.context();
        let brain = self
            .brains
            .get_mut(&agent)
            .ok_or(SimError::AgentNotFound(agent))?;
        Ok(brain.terminate_behavior(&ctx, &mut self.world))
    }

    // Objects ------------------------------------------------------------------

    pub fn add_object(&mut self, spec: ObjectSpec) -> SimResult<Id> {
        if !self.world.in_bounds(spec.tile) {
            return Err(SimError::Config(format!(
                "object `{}` placed outside the grid at {}",
                spec.name, spec.tile
            )));
        }
        let behaviors = spec
            .behaviors
            .iter()
            .map(|name| self.world.catalog().behavior_id(&self.symbols, name))
            .collect::<SimResult<Vec<_>>>()?;
        let name = spec.name.clone();
        let tile = spec.tile;
        let id = self.world.insert_object(spec, behaviors);
        tracing::info!(object = %id, name = %name, %tile, "object added");
        Ok(id)
    }

    /// Remove `object` and everything racked on it.
    ///
    /// Agents using any of them have their whole behavior stack terminated first, so their
    /// cleanup runs while the objects still exist; remaining claims are then cleared.
    pub fn remove_object(&mut self, object: Id) -> SimResult<()> {
        if self.world.object(object).is_none() {
            return Err(SimError::ObjectNotFound(object));
        }
        let members = self.world.rack_tree(object);
        let ctx = self.context();

        let affected: Vec<Id> = self
            .brains
            .iter()
            .filter(|(agent, brain)| {
                brain.targets_any(&members)
                    || members.iter().any(|m| {
                        self.world.object(*m).is_some_and(|o| {
                            o.claims.holds(**agent) || o.holder == Some(**agent)
                        })
                    })
            })
            .map(|(agent, _)| *agent)
            .collect();
        for agent in &affected {
            if let Some(brain) = self.brains.get_mut(agent) {
                brain.terminate_all(&ctx, &mut self.world);
            }
        }

        for member in members.iter().rev() {
            let evicted = self.world.clear_claims(*member);
            if !evicted.is_empty() {
                tracing::debug!(object = %member, ?evicted, "cleared remaining claims");
            }
            self.world.remove_object_entry(*member);
        }
        tracing::info!(
            object = %object,
            removed = members.len(),
            interrupted = affected.len(),
            "object removed"
        );
        Ok(())
    }

    pub fn rack_object(&mut self, item: Id, rack: Id) -> SimResult<()> {
        self.world.rack(item, rack)
    }

    pub fn unrack_object(&mut self, item: Id) -> SimResult<()> {
        if self.world.object(item).is_none() {
            return Err(SimError::ObjectNotFound(item));
        }
        self.world.unrack(item);
        Ok(())
    }

    pub fn set_dispenser_quantity(&mut self, dispenser: Id, quantity: u32) -> SimResult<()> {
        self.world.set_quantity(dispenser, quantity)
    }

    pub fn rotate_object(&mut self, object: Id, facing: Direction) -> SimResult<()> {
        self.world.rotate(object, facing)
    }

    /// Set one need directly, e.g. to script a scenario.
    pub fn set_need(&mut self, agent: Id, need: &str, value: i32) -> SimResult<()> {
        let id = self
            .world
            .catalog()
            .needs()
            .id_by_name(&self.symbols, need)
            .map_err(|_| SimError::UnknownNeed(need.to_string()))?;
        let current = self
            .world
            .need_value(agent, id)
            .ok_or(SimError::AgentNotFound(agent))?;
        self.world.apply_need_delta(agent, id, value.saturating_sub(current));
        Ok(())
    }

    /// Mark a guest as checked in without running the desk routine.
    pub fn check_in(&mut self, agent: Id) -> SimResult<()> {
        let body = self
            .world
            .agent_mut(agent)
            .ok_or(SimError::AgentNotFound(agent))?;
        body.checked_in = true;
        Ok(())
    }
}
