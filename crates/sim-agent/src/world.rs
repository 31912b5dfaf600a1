//! World model: the tile grid, world objects and agent bodies.
//!
//! Claims on racked objects are delegated to the top-level rack they sit on; everything that
//! reserves or releases a slot goes through [`World::claim_owner`].

use sim_claims::ClaimGroup;
use sim_core::{Arena, Id, SimError, SimResult, WorldMut, WorldView};
use sim_nav::{Direction, GridIndex, NavGridView, Navigator, PathError, TileGrid};
use sim_needs::{NeedId, Needs};
use sim_utility::Advertised;

use crate::agent::{AgentBody, Role};
use crate::catalog::{BehaviorId, Catalog};
use crate::config::SimConfig;
use crate::object::{ObjectSpec, WorldObject};

pub type Offer = Advertised<Id, BehaviorId>;

pub struct World {
    grid: TileGrid,
    catalog: Catalog,
    config: SimConfig,
    objects: Arena<WorldObject>,
    agents: Arena<AgentBody>,
}

impl WorldView for World {
    type Agent = Id;
}

impl WorldMut for World {}

impl NavGridView for World {
    fn dimensions(&self) -> (i32, i32, i32) {
        self.grid.dimensions()
    }

    fn is_navigable(&self, at: GridIndex) -> bool {
        self.grid.is_navigable(at)
    }

    fn is_blocked(&self, at: GridIndex) -> bool {
        self.grid.is_blocked(at)
    }
}

impl World {
    pub fn new(grid: TileGrid, catalog: Catalog, config: SimConfig) -> Self {
        Self {
            grid,
            catalog,
            config,
            objects: Arena::new(),
            agents: Arena::new(),
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // Agents ----------------------------------------------------------------

    pub(crate) fn insert_agent(&mut self, role: Role, tile: GridIndex) -> Id {
        let needs = Needs::new(
            self.catalog.needs(),
            self.config.max_happiness,
            self.config.rolling_window.max(1),
        );
        self.agents.insert_with(|id| AgentBody {
            id,
            role,
            nav: Navigator::new(tile),
            needs,
            held: Vec::new(),
            checked_in: false,
            check_in_given_up: false,
            stay_ticks: 0,
            left: false,
        })
    }

    pub(crate) fn remove_agent(&mut self, id: Id) -> Option<AgentBody> {
        self.agents.remove(id)
    }

    pub fn agent(&self, id: Id) -> Option<&AgentBody> {
        self.agents.get(id)
    }

    pub fn agent_mut(&mut self, id: Id) -> Option<&mut AgentBody> {
        self.agents.get_mut(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = (Id, &AgentBody)> {
        self.agents.iter()
    }

    pub fn agent_tile(&self, id: Id) -> Option<GridIndex> {
        self.agents.get(id).map(|body| body.nav.tile())
    }

    /// Idle drift for one agent's needs.
    pub(crate) fn tick_needs(&mut self, agent: Id) -> Option<f32> {
        let catalog = self.catalog.needs();
        let body = self.agents.get_mut(agent)?;
        body.stay_ticks += 1;
        Some(body.needs.tick(catalog))
    }

    pub fn apply_need_delta(&mut self, agent: Id, need: NeedId, delta: i32) -> Option<i32> {
        let catalog = self.catalog.needs();
        let body = self.agents.get_mut(agent)?;
        Some(body.needs.apply_delta(catalog, need, delta))
    }

    pub fn need_value(&self, agent: Id, need: NeedId) -> Option<i32> {
        self.agents.get(agent).map(|body| body.needs.value(need))
    }

    /// Plan a path for `agent`; `Ok(false)` when a path to `goal` is already live. `None` for an
    /// unknown agent.
    pub fn request_path(
        &mut self,
        agent: Id,
        goal: GridIndex,
    ) -> Option<Result<bool, PathError>> {
        let cap = self.config.path_expansion_cap;
        let body = self.agents.get_mut(agent)?;
        Some(body.nav.request(&self.grid, goal, cap))
    }

    pub fn clear_path(&mut self, agent: Id) {
        if let Some(body) = self.agents.get_mut(agent) {
            body.nav.clear();
        }
    }

    pub fn has_arrived(&self, agent: Id, goal: GridIndex) -> bool {
        self.agents
            .get(agent)
            .is_some_and(|body| body.nav.has_arrived(goal))
    }

    pub(crate) fn advance_agent(&mut self, agent: Id, dt_seconds: f32) -> Option<u32> {
        let speed = self.config.walk_speed;
        let body = self.agents.get_mut(agent)?;
        Some(body.nav.advance(dt_seconds, speed))
    }

    // Objects ---------------------------------------------------------------

    pub(crate) fn insert_object(&mut self, spec: ObjectSpec, behaviors: Vec<BehaviorId>) -> Id {
        let id = self.objects.insert_with(|id| WorldObject {
            id,
            name: spec.name,
            tile: spec.tile,
            interaction: spec.interaction.unwrap_or(spec.tile),
            walkable: spec.walkable,
            facing: Direction::default(),
            claims: sim_claims::ClaimPools::new(spec.guest_slots, spec.staff_slots),
            behaviors,
            parent: None,
            racked: Vec::new(),
            holder: None,
            quantity: spec.quantity,
        });
        if !spec.walkable {
            self.grid.add_blocker(spec.tile);
        }
        id
    }

    /// Remove one object entry, detaching it from its rack and holder.
    pub(crate) fn remove_object_entry(&mut self, id: Id) -> Option<WorldObject> {
        self.unrack(id);
        let object = self.objects.remove(id)?;
        if let Some(holder) = object.holder {
            if let Some(body) = self.agents.get_mut(holder) {
                body.held.retain(|held| *held != id);
            }
        } else if !object.walkable {
            self.grid.remove_blocker(object.tile);
        }
        Some(object)
    }

    pub fn object(&self, id: Id) -> Option<&WorldObject> {
        self.objects.get(id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (Id, &WorldObject)> {
        self.objects.iter()
    }

    pub fn find_object(&self, name: &str) -> Option<Id> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// `id` followed by everything racked on it, depth-first.
    pub fn rack_tree(&self, id: Id) -> Vec<Id> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(object) = self.objects.get(next) else {
                continue;
            };
            out.push(next);
            pending.extend(object.racked.iter().rev().copied());
        }
        out
    }

    /// The object whose claim slots govern `id`: the top of its rack chain.
    pub fn claim_owner(&self, id: Id) -> Option<Id> {
        let mut current = id;
        for _ in 0..=self.objects.len() {
            let object = self.objects.get(current)?;
            match object.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
        panic!("rack cycle through object {id}");
    }

    pub fn interaction_tile(&self, id: Id) -> Option<GridIndex> {
        self.objects.get(id).map(|object| object.interaction)
    }

    pub fn has_free_slot(&self, target: Id, group: ClaimGroup) -> bool {
        self.claim_owner(target)
            .and_then(|owner| self.objects.get(owner))
            .is_some_and(|object| object.claims.has_free(group))
    }

    /// Reserve a slot on `target`'s claim owner in the agent's group. `None` means no slot.
    pub fn try_occupy(&mut self, agent: Id, target: Id) -> Option<usize> {
        let group = self.agents.get(agent)?.role.claim_group();
        let owner = self.claim_owner(target)?;
        let object = self.objects.get_mut(owner)?;
        let slot = object.claims.try_occupy(group, agent);
        if slot.is_none() {
            tracing::debug!(agent = %agent, object = %owner, ?group, "claim rejected: no slot");
        }
        slot
    }

    pub fn release_claim(&mut self, agent: Id, target: Id) -> bool {
        let Some(owner) = self.claim_owner(target) else {
            return false;
        };
        self.objects
            .get_mut(owner)
            .is_some_and(|object| object.claims.release_all(agent))
    }

    pub fn release_all_claims(&mut self, agent: Id) {
        for (_, object) in self.objects.iter_mut() {
            object.claims.release_all(agent);
        }
    }

    /// Evict every claim holder of `id`'s own slots. Returns the evicted agents.
    pub fn clear_claims(&mut self, id: Id) -> Vec<Id> {
        self.objects
            .get_mut(id)
            .map(|object| object.claims.clear())
            .unwrap_or_default()
    }

    pub fn holds_claim(&self, agent: Id, target: Id) -> bool {
        self.claim_owner(target)
            .and_then(|owner| self.objects.get(owner))
            .is_some_and(|object| object.claims.holds(agent))
    }

    pub fn rack(&mut self, item: Id, rack: Id) -> SimResult<()> {
        if !self.objects.contains(rack) {
            return Err(SimError::ObjectNotFound(rack));
        }
        let object = self.objects.get(item).ok_or(SimError::ObjectNotFound(item))?;
        if object.is_held() {
            return Err(SimError::Config(format!("object {item} is being carried")));
        }
        if self.rack_tree(item).contains(&rack) {
            return Err(SimError::Config(format!(
                "racking {item} on {rack} would form a cycle"
            )));
        }

        self.unrack(item);
        self.lift(item);
        self.attach(item, rack);
        Ok(())
    }

    /// Place a lifted `item` on `rack`.
    fn attach(&mut self, item: Id, rack: Id) {
        let Some(rack_object) = self.objects.get_mut(rack) else {
            return;
        };
        rack_object.racked.push(item);
        let (tile, interaction) = (rack_object.tile, rack_object.interaction);
        self.place(item, tile, interaction);
        if let Some(object) = self.objects.get_mut(item) {
            object.parent = Some(rack);
        }
    }

    /// Detach `item` from its rack; it stays where it is.
    pub fn unrack(&mut self, item: Id) {
        let Some(parent) = self.objects.get_mut(item).and_then(|o| o.parent.take()) else {
            return;
        };
        if let Some(rack) = self.objects.get_mut(parent) {
            rack.racked.retain(|child| *child != item);
        }
    }

    pub fn rotate(&mut self, id: Id, facing: Direction) -> SimResult<()> {
        let object = self.objects.get_mut(id).ok_or(SimError::ObjectNotFound(id))?;
        object.facing = facing;
        Ok(())
    }

    pub fn set_quantity(&mut self, id: Id, quantity: u32) -> SimResult<()> {
        let object = self.objects.get_mut(id).ok_or(SimError::ObjectNotFound(id))?;
        object.quantity = Some(quantity);
        Ok(())
    }

    /// Take one unit from a dispenser. `false` when it is empty or not a dispenser.
    pub fn take_from_dispenser(&mut self, id: Id) -> bool {
        match self.objects.get_mut(id).and_then(|o| o.quantity.as_mut()) {
            Some(quantity) if *quantity > 0 => {
                *quantity -= 1;
                true
            }
            Some(_) => {
                tracing::debug!(object = %id, "dispense rejected: not enough resource");
                false
            }
            None => false,
        }
    }

    /// Move `object` into the agent's hands, unracking it if needed. Fails when someone else
    /// carries it.
    pub fn pick_up(&mut self, agent: Id, object: Id) -> bool {
        let Some(entry) = self.objects.get(object) else {
            return false;
        };
        match entry.holder {
            Some(holder) if holder == agent => return true,
            Some(_) => return false,
            None => {}
        }
        if !self.agents.contains(agent) {
            return false;
        }

        self.unrack(object);
        self.lift(object);
        if let Some(entry) = self.objects.get_mut(object) {
            entry.holder = Some(agent);
        }
        if let Some(body) = self.agents.get_mut(agent) {
            body.held.push(object);
        }
        true
    }

    /// Put a carried object back on `onto`, or on the agent's tile. Fails when the agent does
    /// not carry it.
    pub fn put_down(&mut self, agent: Id, object: Id, onto: Option<Id>) -> bool {
        let Some(body) = self.agents.get_mut(agent) else {
            return false;
        };
        if !body.is_holding(object) {
            return false;
        }
        body.held.retain(|held| *held != object);
        let tile = body.nav.tile();
        if let Some(entry) = self.objects.get_mut(object) {
            entry.holder = None;
        }

        let rack = onto
            .filter(|rack| self.objects.contains(*rack) && !self.rack_tree(object).contains(rack));
        match rack {
            Some(rack) => self.attach(object, rack),
            None => self.place(object, tile, tile),
        }
        true
    }

    /// Drop everything the agent carries where it stands.
    pub fn drop_all(&mut self, agent: Id) {
        let held = self
            .agents
            .get(agent)
            .map(|body| body.held.clone())
            .unwrap_or_default();
        for object in held {
            self.put_down(agent, object, None);
        }
    }

    fn lift(&mut self, id: Id) {
        if let Some(object) = self.objects.get(id) {
            if !object.walkable && object.holder.is_none() {
                self.grid.remove_blocker(object.tile);
            }
        }
    }

    fn place(&mut self, id: Id, tile: GridIndex, interaction: GridIndex) {
        if let Some(object) = self.objects.get_mut(id) {
            object.tile = tile;
            object.interaction = interaction;
            if !object.walkable {
                self.grid.add_blocker(tile);
            }
        }
    }

    /// Every behavior on offer this tick: the static fallbacks first, then each free-standing
    /// object's behaviors in id order, each followed by those of the objects racked on it.
    pub fn advertised(&self) -> Vec<Offer> {
        let mut out: Vec<Offer> = self
            .catalog
            .fallbacks()
            .into_iter()
            .map(Advertised::fallback)
            .collect();

        for (id, object) in self.objects.iter() {
            if object.parent.is_none() && object.holder.is_none() {
                for member in self.rack_tree(id) {
                    if let Some(object) = self.objects.get(member) {
                        out.extend(
                            object
                                .behaviors
                                .iter()
                                .map(|behavior| Advertised::on(member, *behavior)),
                        );
                    }
                }
            }
        }
        out
    }
}
