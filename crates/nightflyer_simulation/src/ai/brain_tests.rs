//! Tests for the flyer think step.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::ai::brain::{locked_direction, register_dash_hit, think, Perception, ThinkOutcome};
    use crate::ai::components::{
        DashAttempt, FlyerConfig, FlyerMemory, FlyerState, FlyerStateKind, RangedUnlock, UnlockRule,
    };

    const DT: f32 = 1.0 / 60.0;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn sees(position: Vec2, target: Vec2) -> Perception {
        Perception {
            position,
            target: Some(target),
        }
    }

    fn blind(position: Vec2) -> Perception {
        Perception { position, target: None }
    }

    fn dashing(direction: Vec2, config: &FlyerConfig) -> FlyerState {
        FlyerState::Dashing {
            timer: config.dash.max_time,
            dash: DashAttempt::new(direction, config.dash.post_hit_time),
        }
    }

    /// Гоняем тики, пока не выйдем из состояния `kind` (с предохранителем)
    fn run_while(
        kind: FlyerStateKind,
        state: &mut FlyerState,
        memory: &mut FlyerMemory,
        config: &FlyerConfig,
        perception: Perception,
    ) -> Vec<ThinkOutcome> {
        let mut rng = rng();
        let mut outcomes = Vec::new();
        for _ in 0..1000 {
            if state.kind() != kind {
                break;
            }
            outcomes.push(think(state, memory, config, perception, DT, &mut rng));
        }
        outcomes
    }

    #[test]
    fn test_close_target_enters_dash_windup_with_locked_direction() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Patrolling;
        let mut memory = FlyerMemory::default();

        // distance = 1.0 <= dash.start_range (2.2), can_attack = true
        let outcome = think(
            &mut state,
            &mut memory,
            &config,
            sees(Vec2::ZERO, Vec2::new(0.6, 0.8)),
            DT,
            &mut rng(),
        );

        let FlyerState::DashWindup { timer, dash } = state else {
            panic!("expected DashWindup, got {:?}", state);
        };
        assert_eq!(timer, config.dash.windup_time);
        assert!((dash.direction - Vec2::new(0.6, 0.8)).length() < 1e-5);
        assert!(!dash.hit_registered);
        assert_eq!(outcome.velocity, Vec2::ZERO);
        assert_eq!(outcome.transitions.len(), 1);
        assert_eq!(outcome.transitions[0].to, FlyerStateKind::DashWindup);
    }

    #[test]
    fn test_ranged_windup_fires_once_and_enters_cooldown() {
        let config = FlyerConfig::aggressive();
        let ranged = config.ranged.expect("aggressive profile has ranged attack");
        let mut state = FlyerState::RangedWindup { timer: 0.25 };
        let mut memory = FlyerMemory::default();

        let outcome = think(
            &mut state,
            &mut memory,
            &config,
            sees(Vec2::ZERO, Vec2::new(5.0, 0.0)),
            0.25,
            &mut rng(),
        );

        let launch = outcome.launch.expect("projectile fired");
        assert_eq!(launch.direction, Vec2::X);
        assert_eq!(launch.damage, ranged.projectile_damage);
        assert_eq!(state, FlyerState::Cooldown { timer: ranged.cooldown });
        assert!(!memory.can_attack);

        // Следующий тик — кд, второго выстрела нет
        let next = think(
            &mut state,
            &mut memory,
            &config,
            sees(Vec2::ZERO, Vec2::new(5.0, 0.0)),
            DT,
            &mut rng(),
        );
        assert!(next.launch.is_none());
        assert_eq!(state.kind(), FlyerStateKind::Cooldown);
    }

    #[test]
    fn test_ranged_windup_without_target_skips_shot() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::RangedWindup { timer: 0.01 };
        let mut memory = FlyerMemory::default();

        let outcome = think(&mut state, &mut memory, &config, blind(Vec2::ZERO), DT, &mut rng());

        assert!(outcome.launch.is_none());
        assert_eq!(state.kind(), FlyerStateKind::Cooldown);
    }

    #[test]
    fn test_lost_target_while_chasing_returns_to_patrol() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Chasing;
        let mut memory = FlyerMemory::default();

        think(&mut state, &mut memory, &config, blind(Vec2::ZERO), DT, &mut rng());

        assert_eq!(state, FlyerState::Patrolling);
    }

    #[test]
    fn test_lost_target_while_dashing_does_not_interrupt() {
        let config = FlyerConfig::aggressive();
        let mut state = dashing(Vec2::X, &config);
        let mut memory = FlyerMemory::default();

        think(&mut state, &mut memory, &config, blind(Vec2::ZERO), DT, &mut rng());
        assert_eq!(state.kind(), FlyerStateKind::Dashing);

        // Без цели и без попадания рывок доигрывается до maxTime
        let outcomes = run_while(FlyerStateKind::Dashing, &mut state, &mut memory, &config, blind(Vec2::ZERO));
        assert_eq!(state.kind(), FlyerStateKind::DashRecoil);
        let expected_ticks = (config.dash.max_time / DT).ceil() as usize;
        assert!(outcomes.len() + 1 >= expected_ticks - 1 && outcomes.len() + 1 <= expected_ticks + 1);
    }

    #[test]
    fn test_committed_states_ignore_distance_decisions() {
        let config = FlyerConfig::aggressive();
        let far = Vec2::new(100.0, 0.0);
        let committed = [
            FlyerState::DashWindup {
                timer: 1.0,
                dash: DashAttempt::new(Vec2::X, 0.08),
            },
            dashing(Vec2::X, &config),
            FlyerState::DashRecoil {
                timer: 1.0,
                dash: DashAttempt::new(Vec2::X, 0.08),
            },
            FlyerState::RangedWindup { timer: 1.0 },
            FlyerState::Cooldown { timer: 1.0 },
        ];

        for initial in committed {
            for perception in [sees(Vec2::ZERO, far), sees(Vec2::ZERO, Vec2::new(0.5, 0.0)), blind(Vec2::ZERO)] {
                let mut state = initial;
                let mut memory = FlyerMemory::default();
                let outcome = think(&mut state, &mut memory, &config, perception, DT, &mut rng());

                assert_eq!(state.kind(), initial.kind(), "{:?} interrupted by {:?}", initial, perception);
                assert!(outcome.transitions.is_empty());
            }
        }
    }

    #[test]
    fn test_dash_hit_registers_once_per_cycle() {
        let config = FlyerConfig::aggressive();
        let mut state = dashing(Vec2::Y, &config);
        let mut memory = FlyerMemory::default();

        let first = register_dash_hit(&mut state, &mut memory, &config).expect("first contact hits");
        assert_eq!(first.direction, Vec2::Y);
        assert_eq!(first.damage, config.dash.damage);

        for _ in 0..5 {
            assert!(register_dash_hit(&mut state, &mut memory, &config).is_none());
        }
        assert!(state.dash().is_some_and(|dash| dash.hit_registered));
    }

    #[test]
    fn test_dash_hit_outside_dashing_is_ignored() {
        let config = FlyerConfig::aggressive();
        let mut memory = FlyerMemory::default();

        for mut state in [
            FlyerState::Patrolling,
            FlyerState::Chasing,
            FlyerState::DashWindup {
                timer: 0.1,
                dash: DashAttempt::new(Vec2::X, 0.08),
            },
            FlyerState::Cooldown { timer: 1.0 },
        ] {
            assert!(register_dash_hit(&mut state, &mut memory, &config).is_none());
        }
    }

    #[test]
    fn test_hit_shortens_dash_to_post_hit_time() {
        let config = FlyerConfig::aggressive();
        let mut state = dashing(Vec2::X, &config);
        let mut memory = FlyerMemory::default();
        register_dash_hit(&mut state, &mut memory, &config);

        let outcomes = run_while(
            FlyerStateKind::Dashing,
            &mut state,
            &mut memory,
            &config,
            sees(Vec2::ZERO, Vec2::new(1.0, 0.0)),
        );

        // post_hit_time 0.08s ≈ 5 тиков при 60Hz — намного меньше max_time 0.5s
        assert!(outcomes.len() <= 6, "dash lasted {} ticks after hit", outcomes.len());
        assert_eq!(state.kind(), FlyerStateKind::DashRecoil);
    }

    #[test]
    fn test_pass_through_round_trip_on_hit_and_miss() {
        let config = FlyerConfig::aggressive();

        for hit in [true, false] {
            let mut state = FlyerState::DashWindup {
                timer: config.dash.windup_time,
                dash: DashAttempt::new(Vec2::X, config.dash.post_hit_time),
            };
            let mut memory = FlyerMemory::default();
            let mut rng = rng();
            let mut toggles = Vec::new();

            for _ in 0..200 {
                if state.kind() == FlyerStateKind::DashRecoil {
                    break;
                }
                if hit && state.kind() == FlyerStateKind::Dashing {
                    register_dash_hit(&mut state, &mut memory, &config);
                }
                let outcome = think(
                    &mut state,
                    &mut memory,
                    &config,
                    sees(Vec2::ZERO, Vec2::new(1.0, 0.0)),
                    DT,
                    &mut rng,
                );
                if let Some(flag) = outcome.pass_through {
                    toggles.push(flag);
                }
            }

            assert_eq!(state.kind(), FlyerStateKind::DashRecoil, "hit = {}", hit);
            assert_eq!(toggles, vec![true, false], "hit = {}", hit);
        }
    }

    #[test]
    fn test_dash_cycle_velocities() {
        let config = FlyerConfig::aggressive();
        let direction = Vec2::new(0.0, -1.0);
        let mut memory = FlyerMemory::default();
        let perception = sees(Vec2::ZERO, Vec2::new(0.0, -1.0));

        let mut state = dashing(direction, &config);
        let outcome = think(&mut state, &mut memory, &config, perception, DT, &mut rng());
        assert_eq!(outcome.velocity, direction * config.dash.speed);

        let mut state = FlyerState::DashRecoil {
            timer: 1.0,
            dash: DashAttempt::new(direction, 0.0),
        };
        let outcome = think(&mut state, &mut memory, &config, perception, DT, &mut rng());
        assert_eq!(outcome.velocity, -direction * config.dash.recoil_speed);
    }

    #[test]
    fn test_recoil_expiry_enters_dash_cooldown() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::DashRecoil {
            timer: DT,
            dash: DashAttempt::new(Vec2::X, 0.0),
        };
        let mut memory = FlyerMemory::default();

        think(&mut state, &mut memory, &config, blind(Vec2::ZERO), DT, &mut rng());

        assert_eq!(state, FlyerState::Cooldown { timer: config.dash.cooldown });
        assert!(!memory.can_attack);
        assert!(state.dash().is_none());
    }

    #[test]
    fn test_cooldown_moves_away_and_expires_to_chase_or_patrol() {
        let config = FlyerConfig::aggressive();
        let target = Vec2::new(4.0, 0.0);

        let mut state = FlyerState::Cooldown { timer: 1.0 };
        let mut memory = FlyerMemory {
            can_attack: false,
            ..FlyerMemory::default()
        };
        let outcome = think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());
        assert_eq!(outcome.velocity, Vec2::new(-config.patrol_speed, 0.0));

        // Истёк кд, цель в detection range → сразу решаем заново (Chasing → RangedWindup на 4м)
        let mut state = FlyerState::Cooldown { timer: DT };
        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());
        assert!(memory.can_attack);
        assert_eq!(state.kind(), FlyerStateKind::RangedWindup);

        // Истёк кд, цели нет → патруль
        let mut state = FlyerState::Cooldown { timer: DT };
        memory.can_attack = false;
        think(&mut state, &mut memory, &config, blind(Vec2::ZERO), DT, &mut rng());
        assert!(memory.can_attack);
        assert_eq!(state, FlyerState::Patrolling);
    }

    #[test]
    fn test_cooldown_expiry_with_far_target_patrols() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Cooldown { timer: DT };
        let mut memory = FlyerMemory::default();

        think(
            &mut state,
            &mut memory,
            &config,
            sees(Vec2::ZERO, Vec2::new(config.detection_range + 1.0, 0.0)),
            DT,
            &mut rng(),
        );

        assert_eq!(state, FlyerState::Patrolling);
    }

    #[test]
    fn test_decision_table() {
        let config = FlyerConfig::aggressive();
        let cases = [
            (Vec2::new(50.0, 0.0), FlyerStateKind::Patrolling),
            (Vec2::new(9.5, 0.0), FlyerStateKind::Chasing),
            (Vec2::new(5.0, 0.0), FlyerStateKind::RangedWindup),
            (Vec2::new(3.0, 0.0), FlyerStateKind::Chasing),
            (Vec2::new(2.0, 0.0), FlyerStateKind::DashWindup),
        ];

        for (target, expected) in cases {
            let mut state = FlyerState::Patrolling;
            let mut memory = FlyerMemory::default();
            think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());
            assert_eq!(state.kind(), expected, "target at {:?}", target);
        }
    }

    #[test]
    fn test_locked_out_attack_only_chases() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Chasing;
        let mut memory = FlyerMemory {
            can_attack: false,
            ..FlyerMemory::default()
        };

        let outcome = think(&mut state, &mut memory, &config, sees(Vec2::ZERO, Vec2::new(1.0, 0.0)), DT, &mut rng());

        assert_eq!(state, FlyerState::Chasing);
        assert_eq!(outcome.velocity, Vec2::new(config.chase_speed, 0.0));
    }

    #[test]
    fn test_without_ranged_capability_chases_at_range() {
        let config = FlyerConfig::bat();
        let mut state = FlyerState::Patrolling;
        let mut memory = FlyerMemory::default();

        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, Vec2::new(5.0, 0.0)), DT, &mut rng());

        assert_eq!(state, FlyerState::Chasing);
    }

    #[test]
    fn test_unlock_counter_gates_ranged_attack() {
        let config = FlyerConfig::gated();
        let target = Vec2::new(5.0, 0.0);
        let mut memory = FlyerMemory::default();

        let mut state = FlyerState::Patrolling;
        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());
        assert_eq!(state, FlyerState::Chasing, "ranged locked until 2 close hits");

        // Два попавших рывка открывают выстрел
        for _ in 0..2 {
            let mut dash_state = dashing(Vec2::X, &config);
            register_dash_hit(&mut dash_state, &mut memory, &config);
        }
        assert_eq!(memory.close_attacks, 2);

        let mut state = FlyerState::Chasing;
        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());
        assert_eq!(state.kind(), FlyerStateKind::RangedWindup);

        // Выстрел сбрасывает счётчик
        let mut state = FlyerState::RangedWindup { timer: DT };
        let outcome = think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());
        assert!(outcome.launch.is_some());
        assert_eq!(memory.close_attacks, 0);
    }

    #[test]
    fn test_unlock_counter_attempt_rule_counts_misses() {
        let config = FlyerConfig {
            ranged_unlock: Some(RangedUnlock {
                required: 1,
                rule: UnlockRule::Attempts,
            }),
            ..FlyerConfig::gated()
        };
        let mut memory = FlyerMemory::default();
        let mut state = FlyerState::Dashing {
            timer: DT,
            dash: DashAttempt::new(Vec2::X, config.dash.post_hit_time),
        };

        think(&mut state, &mut memory, &config, blind(Vec2::ZERO), DT, &mut rng());

        assert_eq!(state.kind(), FlyerStateKind::DashRecoil);
        assert_eq!(memory.close_attacks, 1);
        assert!(memory.ranged_unlocked(&config));
    }

    #[test]
    fn test_patrol_retargets_inside_area() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Patrolling;
        let mut memory = FlyerMemory::default();
        let mut rng = rng();

        let position = config.patrol_area.center();
        let outcome = think(&mut state, &mut memory, &config, blind(position), DT, &mut rng);

        assert!(config.patrol_area.contains(memory.patrol.target));
        assert_eq!(memory.patrol.retarget_timer, config.patrol_change_time);
        let expected = (memory.patrol.target - position).normalize_or_zero() * config.patrol_speed;
        assert_eq!(outcome.velocity, expected);

        // До истечения таймера точка не меняется
        let first = memory.patrol.target;
        think(&mut state, &mut memory, &config, blind(position), DT, &mut rng);
        assert_eq!(memory.patrol.target, first);
    }

    #[test]
    fn test_chasing_remembers_last_target_position() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Chasing;
        let mut memory = FlyerMemory {
            can_attack: false,
            ..FlyerMemory::default()
        };
        let target = Vec2::new(6.0, 3.0);

        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, target), DT, &mut rng());

        assert_eq!(memory.patrol.target, target);
    }

    #[test]
    fn test_coincident_target_uses_canonical_direction() {
        assert_eq!(locked_direction(Vec2::ONE, Vec2::ONE), Vec2::X);

        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::Patrolling;
        let mut memory = FlyerMemory::default();
        think(&mut state, &mut memory, &config, sees(Vec2::ONE, Vec2::ONE), DT, &mut rng());

        assert_eq!(state.dash().map(|dash| dash.direction), Some(Vec2::X));
    }

    #[test]
    fn test_windup_is_stationary_then_dashes() {
        let config = FlyerConfig::aggressive();
        let mut state = FlyerState::DashWindup {
            timer: config.dash.windup_time,
            dash: DashAttempt::new(Vec2::X, config.dash.post_hit_time),
        };
        let mut memory = FlyerMemory::default();

        let outcomes = run_while(
            FlyerStateKind::DashWindup,
            &mut state,
            &mut memory,
            &config,
            sees(Vec2::ZERO, Vec2::new(1.0, 0.0)),
        );

        let (last, waiting) = outcomes.split_last().expect("at least one tick");
        assert!(waiting.iter().all(|outcome| outcome.velocity == Vec2::ZERO));
        assert_eq!(state.kind(), FlyerStateKind::Dashing);
        assert_eq!(last.pass_through, Some(true));
        assert_eq!(last.velocity, Vec2::X * config.dash.speed);
    }

    /// Fixed timestep Bevy при 60 Hz в том виде, в каком его видит система
    fn fixed_dt() -> f32 {
        std::time::Duration::from_secs_f64(1.0 / 60.0).as_secs_f32()
    }

    /// Сколько тиков по `fixed_dt` состояние `kind` продержится
    fn ticks_in_state(kind: FlyerStateKind, mut state: FlyerState, config: &FlyerConfig) -> usize {
        let mut memory = FlyerMemory::default();
        let mut rng = rng();
        let mut ticks = 0;
        while state.kind() == kind && ticks < 1000 {
            think(&mut state, &mut memory, config, blind(Vec2::ZERO), fixed_dt(), &mut rng);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_ranged_windup_fires_on_fifteenth_tick_at_60hz() {
        let config = FlyerConfig::aggressive();
        let ranged = config.ranged.expect("aggressive profile has ranged attack");
        assert_eq!(ranged.windup_time, 0.25);

        let mut state = FlyerState::RangedWindup {
            timer: ranged.windup_time,
        };
        let mut memory = FlyerMemory::default();
        let mut rng = rng();
        let perception = sees(Vec2::ZERO, Vec2::new(5.0, 0.0));

        for tick in 1..=14 {
            let outcome = think(&mut state, &mut memory, &config, perception, fixed_dt(), &mut rng);
            assert!(outcome.launch.is_none(), "fired early on tick {}", tick);
            assert_eq!(state.kind(), FlyerStateKind::RangedWindup);
        }

        let outcome = think(&mut state, &mut memory, &config, perception, fixed_dt(), &mut rng);
        assert!(outcome.launch.is_some(), "0.25s windup must fire on tick 15");
        assert_eq!(state.kind(), FlyerStateKind::Cooldown);
    }

    #[test]
    fn test_state_timers_expire_on_exact_tick_at_60hz() {
        let config = FlyerConfig::aggressive();
        let dash = DashAttempt::new(Vec2::X, config.dash.post_hit_time);

        // 0.15s / 0.5s / 0.35s / 1.6s
        let windup = FlyerState::DashWindup {
            timer: config.dash.windup_time,
            dash,
        };
        assert_eq!(ticks_in_state(FlyerStateKind::DashWindup, windup, &config), 9);
        assert_eq!(ticks_in_state(FlyerStateKind::Dashing, dashing(Vec2::X, &config), &config), 30);

        let recoil = FlyerState::DashRecoil {
            timer: config.dash.recoil_time,
            dash,
        };
        assert_eq!(ticks_in_state(FlyerStateKind::DashRecoil, recoil, &config), 21);

        let cooldown = FlyerState::Cooldown {
            timer: config.dash.cooldown,
        };
        assert_eq!(ticks_in_state(FlyerStateKind::Cooldown, cooldown, &config), 96);
    }

    #[test]
    fn test_bat_keeps_chasing_inside_lose_range() {
        let config = FlyerConfig::bat();
        assert_eq!(config.detection_range, 10.0);
        let mut memory = FlyerMemory::default();

        // 11 > detection, но < detection * 1.2: погоня продолжается
        let mut state = FlyerState::Chasing;
        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, Vec2::new(11.0, 0.0)), DT, &mut rng());
        assert_eq!(state, FlyerState::Chasing);

        // Из патруля на тех же 11 погоня не начинается
        let mut state = FlyerState::Patrolling;
        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, Vec2::new(11.0, 0.0)), DT, &mut rng());
        assert_eq!(state, FlyerState::Patrolling);

        let mut state = FlyerState::Chasing;
        think(&mut state, &mut memory, &config, sees(Vec2::ZERO, Vec2::new(12.5, 0.0)), DT, &mut rng());
        assert_eq!(state, FlyerState::Patrolling);

        // Без гистерезиса aggressive бросает погоню сразу за detection_range
        let aggressive = FlyerConfig::aggressive();
        let mut state = FlyerState::Chasing;
        think(&mut state, &mut memory, &aggressive, sees(Vec2::ZERO, Vec2::new(11.0, 0.0)), DT, &mut rng());
        assert_eq!(state, FlyerState::Patrolling);
    }
}
