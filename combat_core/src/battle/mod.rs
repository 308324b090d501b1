//! Battle - owns the rosters and drives the timeline
//!
//! One actor resolves per [`Battle::step`]. Everything a turn causes
//! (damage, reactions, buffs, summons, timeline shifts) is applied before
//! the step returns.

mod action;
mod summary;
mod targeting;

pub use action::{ActionOutcome, TalentOutcome};
pub use summary::{BattleOutcome, BattleSummary, CombatantSummary};
pub use targeting::{first_living, living, nearest, within_radius};

use crate::combatant::{Combatant, SummonInfo, SummonSpec, TalentEffect, TalentTarget};
use crate::config::{ConfigError, EngineConstants, RosterConfig};
use crate::damage::{compute_damage, DamageInstance, DamageResult, ReactionHit};
use crate::events::{
    apply_buff, tick_buff_timer, tick_buffs, trigger, Buff, BuffTimerId, EffectRegistry,
    EventContext, EventName, TimelineRequest,
};
use crate::field::{Field, FieldObjectId};
use crate::reaction::{FieldDetonation, ReactionContext, ReactionKind, ReactionOutcome};
use crate::scheduler::{Actor, Scheduler, SchedulerError, SpeedSource, TimelineSlot};
use crate::stats::CombatStats;
use crate::types::{grid_positions, CombatantId, DamageCategory, Position, StatType, Team};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

/// Battle failure
#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Unknown combatant: {0}")]
    UnknownCombatant(CombatantId),
    #[error("{unit} has no talent '{talent}'")]
    UnknownTalent { unit: String, talent: String },
    #[error("Team {0:?} has no combatants")]
    EmptyTeam(Team),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Live cadence of every actor kind
struct ActorSpeeds<'a> {
    units: &'a [Combatant],
    timer_speed: f64,
}

impl SpeedSource for ActorSpeeds<'_> {
    fn speed(&self, actor: &Actor) -> f64 {
        match actor {
            Actor::Combatant(id) => self.units.get(id.0).map(Combatant::speed).unwrap_or(1.0),
            Actor::BuffTimer(_) | Actor::FieldObject(_) => self.timer_speed,
        }
    }
}

/// Row offset between the two teams on the grid
const ENEMY_ROW_OFFSET: i32 = 3;

pub struct Battle {
    units: Vec<Combatant>,
    scheduler: Scheduler,
    field: Field,
    registry: EffectRegistry,
    constants: EngineConstants,
    rng: StdRng,
    summary: BattleSummary,
    next_timer: u64,
    steps: u64,
}

impl Battle {
    /// Assign ids, place both teams on the grid and schedule everyone
    pub fn new(
        players: Vec<Combatant>,
        enemies: Vec<Combatant>,
        constants: EngineConstants,
        registry: EffectRegistry,
        seed: u64,
    ) -> Result<Self, BattleError> {
        if players.is_empty() {
            return Err(BattleError::EmptyTeam(Team::Players));
        }
        if enemies.is_empty() {
            return Err(BattleError::EmptyTeam(Team::Enemies));
        }

        let columns = constants.combat.grid_columns;
        let player_spots = grid_positions(players.len(), columns, 1, Position::new(0, 0));
        let enemy_spots = grid_positions(
            enemies.len(),
            columns,
            1,
            Position::new(0, ENEMY_ROW_OFFSET),
        );

        let mut units = Vec::with_capacity(players.len() + enemies.len());
        let placed = players
            .into_iter()
            .zip(player_spots)
            .map(|(u, p)| (u, p, Team::Players))
            .chain(
                enemies
                    .into_iter()
                    .zip(enemy_spots)
                    .map(|(u, p)| (u, p, Team::Enemies)),
            );
        for (mut unit, position, team) in placed {
            unit.id = CombatantId(units.len());
            unit.team = team;
            unit.position = position;
            units.push(unit);
        }

        let mut scheduler = Scheduler::new(&constants.scheduler);
        let mut summary = BattleSummary::new();
        for unit in &units {
            scheduler.add(Actor::Combatant(unit.id), unit.speed());
            summary.register(unit);
        }

        info!(units = units.len(), seed, "battle created");

        Ok(Battle {
            units,
            scheduler,
            field: Field::new(),
            registry,
            constants,
            rng: StdRng::seed_from_u64(seed),
            summary,
            next_timer: 0,
            steps: 0,
        })
    }

    /// Build a battle from a validated roster with the built-in effects
    pub fn from_config(
        roster: &RosterConfig,
        constants: EngineConstants,
        seed: u64,
    ) -> Result<Self, BattleError> {
        roster.validate()?;
        let players = roster
            .players
            .iter()
            .map(|c| c.to_combatant(Team::Players, &constants))
            .collect();
        let enemies = roster
            .enemies
            .iter()
            .map(|c| c.to_combatant(Team::Enemies, &constants))
            .collect();
        Self::new(
            players,
            enemies,
            constants,
            EffectRegistry::with_defaults(),
            seed,
        )
    }

    pub fn units(&self) -> &[Combatant] {
        &self.units
    }

    pub fn unit(&self, id: CombatantId) -> Result<&Combatant, BattleError> {
        self.units.get(id.0).ok_or(BattleError::UnknownCombatant(id))
    }

    pub fn unit_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, BattleError> {
        self.units
            .get_mut(id.0)
            .ok_or(BattleError::UnknownCombatant(id))
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }

    pub fn summary(&self) -> &BattleSummary {
        &self.summary
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Upcoming turn order
    pub fn turn_order(&self, limit: usize) -> Vec<TimelineSlot> {
        self.scheduler.preview(limit)
    }

    /// Battle result, if one side is out of (non-summon) combatants
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let standing = |team: Team| {
            self.units
                .iter()
                .any(|u| u.team == team && !u.is_summon() && u.is_alive())
        };
        if !standing(Team::Players) {
            Some(BattleOutcome::EnemiesWin)
        } else if !standing(Team::Enemies) {
            Some(BattleOutcome::PlayersWin)
        } else {
            None
        }
    }

    // === Timeline ===

    fn apply_requests(&mut self, requests: Vec<TimelineRequest>) {
        for request in requests {
            let speeds = ActorSpeeds {
                units: &self.units,
                timer_speed: self.constants.scheduler.timer_speed,
            };
            self.scheduler
                .delay_by_percent(Actor::Combatant(request.actor), request.percent, &speeds);
        }
    }

    /// Move a combatant's next turn by a fraction of its cycle
    pub fn shift_timeline(&mut self, id: CombatantId, percent: f64) -> bool {
        let speeds = ActorSpeeds {
            units: &self.units,
            timer_speed: self.constants.scheduler.timer_speed,
        };
        self.scheduler
            .delay_by_percent(Actor::Combatant(id), percent, &speeds)
    }

    // === Events ===

    fn dispatch(&mut self, context: EventContext, audience: &[CombatantId]) {
        let requests = trigger(&self.registry, &context, audience, &mut self.units);
        self.apply_requests(requests);
    }

    /// Living members of the subject's team
    fn team_audience(&self, subject: CombatantId) -> Vec<CombatantId> {
        self.units
            .get(subject.0)
            .map(|u| living(&self.units, u.team))
            .unwrap_or_default()
    }

    // === HP ===

    /// Deal HP damage and notify the target's team
    pub fn take_damage(
        &mut self,
        source: Option<CombatantId>,
        target: CombatantId,
        amount: i64,
    ) -> Result<i64, BattleError> {
        let unit = self.unit_mut(target)?;
        if !unit.is_alive() {
            return Ok(0);
        }
        let lost = unit.take_damage(amount);
        let died = !unit.is_alive();
        let name = unit.name.clone();
        self.summary.record_damage(source, target, lost);

        let audience = self.team_audience(target);
        let mut context = EventContext::new(EventName::DamageTaken)
            .with_target(target)
            .with_amount(amount.max(0) as f64);
        if let Some(source) = source {
            context = context.with_source(source);
        }
        self.dispatch(context.clone(), &audience);

        if lost > 0 {
            context.event = EventName::HpChange;
            context.amount = -(lost as f64);
            self.dispatch(context, &audience);
        }

        if died {
            info!(unit = %name, "defeated");
            self.scheduler.remove(Actor::Combatant(target));
        }
        Ok(lost)
    }

    /// Restore HP and notify the target's team
    pub fn heal(
        &mut self,
        source: Option<CombatantId>,
        target: CombatantId,
        amount: i64,
    ) -> Result<i64, BattleError> {
        let unit = self.unit_mut(target)?;
        if !unit.is_alive() {
            return Ok(0);
        }
        let restored = unit.heal(amount);
        self.summary.record_healing(source, restored);
        // HP-change hooks only see real changes
        if restored == 0 {
            return Ok(0);
        }

        let audience = self.team_audience(target);
        let mut context = EventContext::new(EventName::HpChange)
            .with_target(target)
            .with_amount(restored as f64);
        if let Some(source) = source {
            context = context.with_source(source);
        }
        self.dispatch(context, &audience);
        Ok(restored)
    }

    // === Buffs ===

    /// Attach a buff, scheduling its timer actor when it has one
    pub fn attach_buff(&mut self, target: CombatantId, mut buff: Buff) -> Result<(), BattleError> {
        if buff.timer {
            let id = BuffTimerId(self.next_timer);
            self.next_timer += 1;
            buff.timer_id = Some(id);
        }
        let timer_id = buff.timer_id;
        let context = EventContext::new(EventName::Custom("buff_applied".to_string()))
            .with_target(target);

        let unit = self.units.get_mut(target.0).ok_or(BattleError::UnknownCombatant(target))?;
        let before = unit.buffs.len();
        let requests = apply_buff(unit, buff, &self.registry, &context);
        let added = unit.buffs.len() > before;
        self.apply_requests(requests);

        if let (Some(id), true) = (timer_id, added) {
            self.scheduler
                .add(Actor::BuffTimer(id), self.constants.scheduler.timer_speed);
        }
        Ok(())
    }

    fn tick_timer(&mut self, timer: BuffTimerId) {
        let owner = self
            .units
            .iter()
            .position(|u| u.buffs.iter().any(|b| b.timer_id == Some(timer)));
        let Some(owner) = owner else {
            self.scheduler.remove(Actor::BuffTimer(timer));
            return;
        };

        let context = EventContext::new(EventName::Custom("buff_timer".to_string()))
            .with_target(CombatantId(owner));
        let (expired, requests) =
            tick_buff_timer(&mut self.units[owner], timer, &self.registry, &context);
        self.apply_requests(requests);
        if expired {
            self.scheduler.remove(Actor::BuffTimer(timer));
        }
    }

    // === Damage ===

    /// Resolve one damage instance from `attacker` on `primary`
    ///
    /// AoE instances also hit every living ally of the primary within
    /// `aoe_radius`. The internal cooldown is checked once, against the
    /// primary; when it suppresses the element every target receives the
    /// element-less copy.
    pub fn apply_damage_instance(
        &mut self,
        attacker: CombatantId,
        primary: CombatantId,
        instance: &DamageInstance,
        category: DamageCategory,
    ) -> Result<Vec<DamageResult>, BattleError> {
        let defender = self.unit(primary)?;
        let mut targets = vec![primary];
        if instance.aoe_radius > 0.0 {
            targets.extend(within_radius(
                &self.units,
                defender.team,
                defender.position,
                instance.aoe_radius,
                Some(primary),
            ));
        }

        let source = self.unit_mut(attacker)?;
        let permitted = source
            .icd
            .permit(primary, &instance.icd_tag, instance.icd_interval);
        let effective = if permitted {
            instance.clone()
        } else {
            debug!(attacker = %source.name, tag = %instance.icd_tag, "element suppressed by ICD");
            instance.suppressed()
        };
        let attacker_unit = source.clone();

        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            if !self.unit(target)?.is_alive() {
                continue;
            }
            let result = {
                let defender = &mut self.units[target.0];
                let mut ctx = ReactionContext {
                    constants: &self.constants,
                    field: &mut self.field,
                };
                compute_damage(
                    &attacker_unit,
                    defender,
                    &effective,
                    category,
                    &mut ctx,
                    &mut self.rng,
                )
            };

            self.take_damage(Some(attacker), target, result.damage)?;
            if let Some(outcome) = &result.outcome {
                self.resolve_outcome(attacker, target, outcome)?;
            }
            for hit in &result.reaction_hits {
                self.deal_reaction_hit(hit)?;
            }
            results.push(result);
        }
        Ok(results)
    }

    /// Apply the battle-level consequences of a reaction
    fn resolve_outcome(
        &mut self,
        attacker: CombatantId,
        target: CombatantId,
        outcome: &ReactionOutcome,
    ) -> Result<(), BattleError> {
        let Some(reaction) = outcome.reaction else {
            return Ok(());
        };
        self.summary.record_reaction(reaction);
        let attacker_name = &self.unit(attacker)?.name;
        let target_name = &self.unit(target)?.name;
        info!(attacker = %attacker_name, target = %target_name, reaction = %reaction, "reaction");

        if let Some(shift) = outcome.timeline_shift {
            self.shift_timeline(target, shift);
        }
        if let Some(core) = outcome.spawned_core {
            self.scheduler.add(
                Actor::FieldObject(core),
                self.constants.scheduler.timer_speed,
            );
        }
        if let Some(detonation) = &outcome.detonation {
            self.detonate(attacker, detonation)?;
        }
        if let Some(debuff) = &outcome.debuff {
            self.attach_buff(target, debuff.clone())?;
        }

        let context = EventContext::new(EventName::ReactionTriggered)
            .with_source(attacker)
            .with_target(target)
            .with_reaction(reaction);
        self.dispatch(context, &[attacker]);
        Ok(())
    }

    fn detonate(&mut self, attacker: CombatantId, detonation: &FieldDetonation) -> Result<(), BattleError> {
        let enemy_team = self.unit(attacker)?.team.opponent();
        let targets = if detonation.reaction == ReactionKind::Hyperbloom {
            nearest(&self.units, enemy_team, detonation.position)
                .into_iter()
                .collect()
        } else {
            within_radius(
                &self.units,
                enemy_team,
                detonation.position,
                detonation.radius,
                None,
            )
        };

        for target in targets {
            self.take_damage(Some(attacker), target, detonation.damage)?;
        }
        self.retire_field_object(detonation.object);
        Ok(())
    }

    fn retire_field_object(&mut self, id: FieldObjectId) {
        self.field.deactivate(id);
        self.scheduler.remove(Actor::FieldObject(id));
        self.field.prune();
    }

    /// Deal a transformative hit to its target and splash its neighbours
    fn deal_reaction_hit(&mut self, hit: &ReactionHit) -> Result<(), BattleError> {
        let target = self.unit(hit.target)?;
        let mut victims = vec![hit.target];
        if hit.aoe_radius > 0.0 {
            victims.extend(within_radius(
                &self.units,
                target.team,
                target.position,
                hit.aoe_radius,
                Some(hit.target),
            ));
        }
        debug!(
            reaction = %hit.reaction,
            damage = hit.damage,
            targets = victims.len(),
            "reaction hit"
        );
        for victim in victims {
            self.take_damage(Some(hit.source), victim, hit.damage)?;
        }
        Ok(())
    }

    // === Talents ===

    /// Use a talent on `target`
    ///
    /// Lacking energy, an active cooldown or the wrong form is a refused
    /// outcome, not an error. Basic attacks of the active chain advance the
    /// combo; any other category resets it.
    pub fn use_talent(
        &mut self,
        user: CombatantId,
        target: CombatantId,
        talent_id: &str,
    ) -> Result<TalentOutcome, BattleError> {
        let unit = self.unit(user)?;
        let talent = unit
            .talent(talent_id)
            .cloned()
            .ok_or_else(|| BattleError::UnknownTalent {
                unit: unit.name.clone(),
                talent: talent_id.to_string(),
            })?;

        if !unit.form_allows(&talent) {
            return Ok(TalentOutcome::refused(&talent.id, ActionOutcome::FormLocked));
        }
        if !unit.cooldowns.is_ready(&talent.id) {
            return Ok(TalentOutcome::refused(&talent.id, ActionOutcome::OnCooldown));
        }
        if !unit.energy.can_afford(&talent.energy_kind, talent.energy_cost) {
            return Ok(TalentOutcome::refused(
                &talent.id,
                ActionOutcome::InsufficientEnergy,
            ));
        }

        let target_name = &self.unit(target)?.name;
        info!(unit = %unit.name, talent = %talent.name, target = %target_name, "talent used");

        let unit = self.unit_mut(user)?;
        // +1: the cooldown also ticks at the end of this turn
        if talent.cooldown > 0 {
            unit.cooldowns.start(&talent.id, talent.cooldown + 1);
        }
        unit.energy.spend(&talent.energy_kind, talent.energy_cost);
        if unit.active_chain().is_some_and(|chain| chain.contains(&talent.id)) {
            unit.advance_combo();
        } else if talent.category != DamageCategory::NormalAttack {
            unit.reset_combo();
        }
        self.summary.record_talent(user);

        let mut outcome = TalentOutcome::refused(&talent.id, ActionOutcome::Used);
        let mut primary = target;
        for instance in &talent.instances {
            if !self.unit(primary)?.is_alive() {
                let team = self.unit(primary)?.team;
                match first_living(&self.units, team) {
                    Some(next) => primary = next,
                    None => break,
                }
            }
            let results = self.apply_damage_instance(user, primary, instance, talent.category)?;
            outcome
                .reactions
                .extend(results.iter().filter_map(DamageResult::reaction));
            outcome.results.extend(results);
        }

        for effect in &talent.on_use {
            self.run_talent_effect(user, target, effect)?;
        }

        let unit = self.unit_mut(user)?;
        let recharge = 1.0 + unit.stats.get(StatType::EnergyRecharge);
        unit.energy
            .gain(&talent.energy_kind, talent.energy_gain * recharge);

        Ok(outcome)
    }

    fn recipients(&self, user: CombatantId, target: CombatantId, who: TalentTarget) -> Vec<CombatantId> {
        match who {
            TalentTarget::User => vec![user],
            TalentTarget::Target => vec![target],
            TalentTarget::Allies => self
                .units
                .get(user.0)
                .map(|u| living(&self.units, u.team))
                .unwrap_or_default(),
        }
    }

    fn run_talent_effect(
        &mut self,
        user: CombatantId,
        target: CombatantId,
        effect: &TalentEffect,
    ) -> Result<(), BattleError> {
        match effect {
            TalentEffect::ShiftTimeline { target: who, percent } => {
                for id in self.recipients(user, target, *who) {
                    self.shift_timeline(id, *percent);
                }
            }
            TalentEffect::GrantEnergy {
                target: who,
                energy,
                amount,
            } => {
                for id in self.recipients(user, target, *who) {
                    self.unit_mut(id)?.energy.gain(energy, *amount);
                }
            }
            TalentEffect::ApplyBuff { target: who, buff } => {
                for id in self.recipients(user, target, *who) {
                    self.attach_buff(id, buff.clone().from_source(user))?;
                }
            }
            TalentEffect::Heal { target: who, fraction } => {
                for id in self.recipients(user, target, *who) {
                    let amount = (self.unit(id)?.max_hp as f64 * fraction).round() as i64;
                    self.heal(Some(user), id, amount)?;
                }
            }
            TalentEffect::Summon(spec) => {
                self.summon(user, spec)?;
            }
        }
        Ok(())
    }

    /// Add a summon next to its owner and put it on the timeline
    pub fn summon(&mut self, owner: CombatantId, spec: &SummonSpec) -> Result<CombatantId, BattleError> {
        let parent = self.unit(owner)?;
        let id = CombatantId(self.units.len());
        let mut unit = Combatant::new(
            id,
            spec.name.clone(),
            parent.team,
            spec.element,
            spec.stats.clone(),
        )
        .with_level(parent.level)
        .with_position(parent.position);
        unit.stats = CombatStats::from_base(&spec.stats);
        unit.talents = spec.talents.clone();
        unit.summon = Some(SummonInfo {
            owner,
            remaining_turns: spec.lifetime,
        });

        info!(owner = %parent.name, summon = %unit.name, turns = spec.lifetime, "summoned");
        self.scheduler.add(Actor::Combatant(id), unit.speed());
        self.summary.register(&unit);
        self.units.push(unit);
        Ok(id)
    }

    // === Turns ===

    /// Resolve the next actor on the timeline
    pub fn step(&mut self) -> Result<Actor, BattleError> {
        let speeds = ActorSpeeds {
            units: &self.units,
            timer_speed: self.constants.scheduler.timer_speed,
        };
        let actor = self.scheduler.pop_next(&speeds)?;
        self.steps += 1;

        match actor {
            Actor::BuffTimer(timer) => self.tick_timer(timer),
            Actor::FieldObject(object) => {
                if !self.field.tick(object) {
                    self.retire_field_object(object);
                }
            }
            Actor::Combatant(id) => self.take_turn(id)?,
        }
        Ok(actor)
    }

    fn take_turn(&mut self, id: CombatantId) -> Result<(), BattleError> {
        let unit = self.unit_mut(id)?;
        if !unit.is_alive() {
            self.scheduler.remove(Actor::Combatant(id));
            return Ok(());
        }

        let frozen = unit.frozen;
        unit.frozen = false;
        let name = unit.name.clone();
        self.summary.record_turn(id);
        info!(unit = %name, clock = self.scheduler.clock(), "turn");

        if frozen {
            info!(unit = %name, "frozen, turn skipped");
        } else {
            self.dispatch(EventContext::new(EventName::TurnStart).with_target(id), &[id]);
            self.act(id)?;
            self.dispatch(EventContext::new(EventName::TurnEnd).with_target(id), &[id]);
        }

        self.end_turn(id)
    }

    /// Auto-battler: preferred talent on the first living opponent
    fn act(&mut self, id: CombatantId) -> Result<(), BattleError> {
        let unit = self.unit(id)?;
        if !unit.is_alive() {
            return Ok(());
        }
        let Some(target) = first_living(&self.units, unit.team.opponent()) else {
            return Ok(());
        };
        let Some(talent) = unit.preferred_talent().map(|t| t.id.clone()) else {
            debug!(unit = %unit.name, "no talents, passing");
            return Ok(());
        };

        let outcome = self.use_talent(id, target, &talent)?;
        if !outcome.used() {
            let name = &self.unit(id)?.name;
            debug!(unit = %name, talent = %talent, action = ?outcome.action, "talent refused");
        }
        Ok(())
    }

    /// Buff countdown, cooldowns, aura decay and summon lifetime
    fn end_turn(&mut self, id: CombatantId) -> Result<(), BattleError> {
        let context = EventContext::new(EventName::TurnEnd).with_target(id);
        let unit = self
            .units
            .get_mut(id.0)
            .ok_or(BattleError::UnknownCombatant(id))?;
        let requests = tick_buffs(unit, &self.registry, &context);
        unit.cooldowns.tick();
        for aura in unit.auras.decay_all() {
            debug!(unit = %unit.name, aura = %aura.name, "aura expired");
        }

        let mut departed = false;
        if let Some(summon) = unit.summon.as_mut() {
            summon.remaining_turns = summon.remaining_turns.saturating_sub(1);
            if summon.remaining_turns == 0 {
                unit.departed = true;
                departed = true;
                info!(summon = %unit.name, "summon left the field");
            }
        }

        self.apply_requests(requests);
        if departed {
            self.scheduler.remove(Actor::Combatant(id));
        }
        Ok(())
    }

    /// Step until one side falls or `max_steps` actors have resolved
    pub fn run(&mut self, max_steps: u64) -> Result<BattleOutcome, BattleError> {
        let result = loop {
            if let Some(outcome) = self.outcome() {
                break outcome;
            }
            if self.steps >= max_steps {
                break BattleOutcome::StepLimit;
            }
            self.step()?;
        };

        self.summary.outcome = Some(result);
        self.summary.steps = self.steps;
        self.summary.clock = self.scheduler.clock();
        self.summary.snapshot(&self.units);
        info!(outcome = %result, steps = self.steps, "battle finished");
        Ok(result)
    }
}
