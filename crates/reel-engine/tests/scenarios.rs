//! End-to-end playback scenarios against the mock host.
//!
//! Each test builds an animation from fixtures, drives a session through
//! the public API only, and inspects the mock host's actor table.

use reel_core::{
    Animation, EntityKind, EventCategory, EventKind, Frame, Pose, Timeline,
};
use reel_engine::{
    PlaybackConfig, PlaybackRegistry, PlaybackSession, PlaybackState, SessionRole,
};
use reel_test_utils::{straight_line, walk_timeline, MockHost};

// ── Helpers ─────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn three_frame_walk() -> Timeline {
    Timeline::new(
        "minecraft:villager",
        vec![
            Frame::at(0.0, 0.0, 0.0),
            Frame::at(1.0, 0.0, 0.0),
            Frame::at(2.0, 0.0, 0.0),
        ],
    )
}

fn start(animation: &Animation, config: PlaybackConfig, host: &mut MockHost) -> PlaybackSession {
    let mut session = PlaybackSession::new(animation, config).unwrap();
    session.start(host, None);
    session
}

fn solo(timeline: Timeline) -> Animation {
    Animation::new("solo", timeline.shared())
}

// ── Lifecycle ───────────────────────────────────────────────────

#[test]
fn three_tick_timeline_ends_and_releases_actor() {
    init_tracing();
    let mut host = MockHost::new();
    let mut session = start(&solo(three_frame_walk()), PlaybackConfig::default(), &mut host);
    let handle = session.master().handle().unwrap();

    session.tick(&mut host);
    session.tick(&mut host);
    assert!(session.is_playing());
    session.tick(&mut host);

    assert!(session.has_ended());
    assert!(!session.is_playing());
    assert_eq!(session.state(), PlaybackState::Ended);
    assert!(session.master().handle().is_none());
    assert!(!host.is_live(handle));
    assert_eq!(
        host.placements(handle),
        vec![
            Frame::at(0.0, 0.0, 0.0),
            Frame::at(1.0, 0.0, 0.0),
            Frame::at(2.0, 0.0, 0.0),
        ]
    );
}

#[test]
fn crouch_is_undone_by_respawning_seek_to_zero() {
    init_tracing();
    let mut host = MockHost::new();
    let timeline = three_frame_walk().with_event(1, EventKind::Pose(Pose::Crouching));
    let mut session = start(&solo(timeline), PlaybackConfig::default(), &mut host);

    session.tick(&mut host);
    session.tick(&mut host);
    let before = session.master().handle().unwrap();
    assert_eq!(host.actor(before).unwrap().pose, Pose::Crouching);

    session.change_location_by_tick(0, false, &mut host);
    let after = session.master().handle().unwrap();
    assert_ne!(before, after);
    assert!(!host.is_live(before));
    assert_eq!(host.actor(after).unwrap().pose, Pose::Standing);
    assert_eq!(session.get_tick(), 0);
}

#[test]
fn crouch_is_undone_by_seamless_seek_to_zero() {
    let mut host = MockHost::new();
    let timeline = three_frame_walk().with_event(1, EventKind::Pose(Pose::Crouching));
    let mut session = start(&solo(timeline), PlaybackConfig::default(), &mut host);

    session.tick(&mut host);
    session.tick(&mut host);
    let handle = session.master().handle().unwrap();
    session.change_location_by_tick(0, true, &mut host);

    assert_eq!(session.master().handle(), Some(handle));
    let actor = host.actor(handle).unwrap();
    assert_eq!(actor.pose, Pose::Standing);
    assert_eq!(actor.frame, Frame::at(0.0, 0.0, 0.0));
    assert_eq!(actor.motion, None);
}

#[test]
fn secondary_spawns_exactly_at_its_spawn_tick() {
    init_tracing();
    let mut host = MockHost::new();
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 5).shared())
        .with_secondary(walk_timeline("minecraft:zombie", 3).with_spawn_tick(2).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);

    assert!(session.players()[1].handle().is_none());
    session.tick(&mut host);
    assert_eq!(session.get_tick(), 1);
    assert!(session.players()[1].handle().is_none());

    session.tick(&mut host);
    assert_eq!(session.get_tick(), 2);
    let zombie = session.players()[1].handle().unwrap();
    assert_eq!(host.actor(zombie).unwrap().frame, Frame::at(0.0, 0.0, 0.0));
    assert_eq!(host.actor(zombie).unwrap().kind, EntityKind::from("minecraft:zombie"));
    assert_eq!(session.players()[1].local_tick(), 0);
}

#[test]
fn secondary_events_fire_on_the_shared_clock() {
    let mut host = MockHost::new();
    let zombie = walk_timeline("minecraft:zombie", 3)
        .with_spawn_tick(2)
        .with_event(3, EventKind::Death);
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 6).shared())
        .with_secondary(zombie.shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);

    for _ in 0..2 {
        session.tick(&mut host);
    }
    let h = session.players()[1].handle().unwrap();
    assert!(host.actor(h).unwrap().alive);
    session.tick(&mut host);
    assert!(!host.actor(h).unwrap().alive);
}

#[test]
fn seeking_before_spawn_tick_despawns_secondary() {
    let mut host = MockHost::new();
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 6).shared())
        .with_secondary(walk_timeline("minecraft:zombie", 3).with_spawn_tick(2).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);
    session.change_location_by_tick(4, true, &mut host);
    let zombie = session.players()[1].handle().unwrap();

    session.change_location_by_tick(1, true, &mut host);
    assert!(session.players()[1].handle().is_none());
    assert!(!host.is_live(zombie));
    assert_eq!(host.live_count(), 1);
}

#[test]
fn session_runs_until_longest_actor_ends() {
    let mut host = MockHost::new();
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 3).shared())
        .with_secondary(walk_timeline("minecraft:zombie", 4).with_spawn_tick(2).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);
    assert_eq!(session.get_max_tick(), 5);

    let mut ticks = 0;
    while session.is_playing() {
        session.tick(&mut host);
        ticks += 1;
    }
    assert_eq!(ticks, 6);
    assert_eq!(host.live_count(), 0);
}

// ── Looping ─────────────────────────────────────────────────────

#[test]
fn discontinuous_loop_respawns_master_at_frame_zero() {
    init_tracing();
    let mut host = MockHost::new();
    let mut session = start(&solo(walk_timeline("minecraft:player", 4)), PlaybackConfig::looping(), &mut host);
    let first = session.master().handle().unwrap();

    for _ in 0..4 {
        session.tick(&mut host);
    }

    assert!(session.is_playing());
    assert_eq!(session.get_tick(), 0);
    assert!(!host.is_live(first));
    let second = session.master().handle().unwrap();
    assert_ne!(first, second);
    assert_eq!(host.actor(second).unwrap().frame, Frame::at(0.0, 0.0, 0.0));
    assert_eq!(session.metrics().loops, 1);
}

#[test]
fn continuous_loop_keeps_the_same_actor() {
    let mut host = MockHost::new();
    let frames = vec![
        Frame::at(0.0, 0.0, 0.0),
        Frame::at(0.3, 0.0, 0.0),
        Frame::at(0.1, 0.0, 0.0),
    ];
    let timeline = Timeline::new("minecraft:player", frames)
        .with_event(1, EventKind::Pose(Pose::Crouching));
    let mut session = start(&solo(timeline), PlaybackConfig::looping(), &mut host);
    let handle = session.master().handle().unwrap();

    for _ in 0..3 {
        session.tick(&mut host);
    }
    assert_eq!(session.get_tick(), 0);
    assert_eq!(session.master().handle(), Some(handle));
    let actor = host.actor(handle).unwrap();
    assert_eq!(actor.frame, Frame::at(0.0, 0.0, 0.0));
    assert_eq!(actor.pose, Pose::Standing);

    // Second cycle replays the event again.
    session.tick(&mut host);
    assert_eq!(host.actor(handle).unwrap().pose, Pose::Crouching);
}

#[test]
fn unique_session_never_loops() {
    let mut host = MockHost::new();
    let config = PlaybackConfig {
        unique: true,
        ..PlaybackConfig::looping()
    };
    let mut session = start(&solo(walk_timeline("minecraft:player", 2)), config, &mut host);
    session.tick(&mut host);
    session.tick(&mut host);
    assert!(session.has_ended());
    assert_eq!(host.live_count(), 0);
}

#[test]
fn recording_role_keeps_actor_for_handover() {
    let mut host = MockHost::new();
    let config = PlaybackConfig {
        role: SessionRole::Recording,
        ..PlaybackConfig::looping()
    };
    let mut first = start(&solo(walk_timeline("minecraft:player", 2)), config, &mut host);
    first.tick(&mut host);
    first.tick(&mut host);
    assert!(first.has_ended());
    let carried = first.take_master_handle().unwrap();

    let mut second = PlaybackSession::new(
        &solo(walk_timeline("minecraft:player", 3)),
        PlaybackConfig::default(),
    )
    .unwrap();
    second.start(&mut host, Some(carried));
    assert_eq!(second.master().handle(), Some(carried));
    assert_eq!(host.spawn_count(), 1);
}

#[test]
fn toggling_looping_mid_cycle_stops_at_end() {
    let mut host = MockHost::new();
    let mut session = start(&solo(walk_timeline("minecraft:player", 3)), PlaybackConfig::looping(), &mut host);
    session.tick(&mut host);
    session.set_looping(false);
    session.tick(&mut host);
    session.tick(&mut host);
    assert!(session.has_ended());
}

// ── Stop ────────────────────────────────────────────────────────

#[test]
fn stop_twice_matches_stop_once() {
    let mut host = MockHost::new();
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 5).shared())
        .with_secondary(walk_timeline("minecraft:zombie", 5).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);
    session.tick(&mut host);

    session.stop(&mut host, true);
    let despawns = host.despawn_count();
    let metrics = session.metrics().clone();
    session.stop(&mut host, true);

    assert_eq!(host.despawn_count(), despawns);
    assert_eq!(host.stray_despawns(), 0);
    assert_eq!(session.metrics(), &metrics);
    assert_eq!(host.live_count(), 0);
    assert!(session.has_ended());
}

#[test]
fn stop_without_kill_leaves_actors_in_place() {
    let mut host = MockHost::new();
    let mut session = start(&solo(walk_timeline("minecraft:player", 5)), PlaybackConfig::default(), &mut host);
    session.tick(&mut host);
    session.stop(&mut host, false);
    assert_eq!(host.live_count(), 1);
    session.tick(&mut host);
    assert_eq!(session.get_tick(), 1);
}

// ── Degraded playback ───────────────────────────────────────────

#[test]
fn unbound_secondary_never_appears() {
    init_tracing();
    let mut host = MockHost::new();
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 3).shared())
        .with_secondary(Timeline::unbound(straight_line(10, 1.0)).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);

    for _ in 0..3 {
        session.tick(&mut host);
    }
    assert!(session.has_ended());
    assert!(session.players()[1].handle().is_none());
    assert_eq!(host.spawn_count(), 1);
}

#[test]
fn rejected_secondary_does_not_stall_master() {
    init_tracing();
    let mut host = MockHost::new();
    host.reject_kind("minecraft:ghast");
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 4).shared())
        .with_secondary(walk_timeline("minecraft:ghast", 4).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);

    session.tick(&mut host);
    session.tick(&mut host);
    let master = session.master().handle().unwrap();
    assert_eq!(host.actor(master).unwrap().frame, Frame::at(1.0, 0.0, 0.0));
    assert!(session.players()[1].handle().is_none());
    assert!(session.metrics().spawn_failures >= 2);
}

#[test]
fn malformed_actor_state_abandons_spawn() {
    init_tracing();
    let mut host = MockHost::new();
    let broken = walk_timeline("minecraft:armor_stand", 4).with_actor_state(vec![0xff, 0xfe, 0xfd]);
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 4).shared())
        .with_secondary(broken.shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);

    assert!(session.players()[1].handle().is_none());
    assert_eq!(host.live_count(), 1);
    for _ in 0..4 {
        session.tick(&mut host);
    }
    assert!(session.has_ended());
}

#[test]
fn retried_spawn_matches_a_seek_to_the_same_tick() {
    init_tracing();
    let zombie = walk_timeline("minecraft:zombie", 4)
        .with_spawn_tick(1)
        .with_event(1, EventKind::Pose(Pose::Crouching));
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 6).shared())
        .with_secondary(zombie.shared());

    let mut host = MockHost::new();
    let mut ticked = start(&animation, PlaybackConfig::default(), &mut host);
    host.fail_next_spawns(1);
    ticked.tick(&mut host);
    assert!(ticked.players()[1].handle().is_none());
    ticked.tick(&mut host);

    let mut seek_host = MockHost::new();
    let mut sought = start(&animation, PlaybackConfig::default(), &mut seek_host);
    sought.change_location_by_tick(2, false, &mut seek_host);

    let late = host.actor(ticked.players()[1].handle().unwrap()).unwrap();
    let direct = seek_host.actor(sought.players()[1].handle().unwrap()).unwrap();
    assert_eq!(late.pose, Pose::Crouching);
    assert_eq!(late.event_state(), direct.event_state());
    assert_eq!(ticked.players()[1].local_tick(), sought.players()[1].local_tick());
}

#[test]
fn unsupported_events_are_skipped() {
    init_tracing();
    let mut host = MockHost::new();
    host.disable(EventCategory::Emote);
    let timeline = walk_timeline("minecraft:player", 4)
        .with_event(1, EventKind::Emote { name: Some("wave".into()) })
        .with_event(1, EventKind::Pose(Pose::Crouching));
    let mut session = start(&solo(timeline), PlaybackConfig::default(), &mut host);

    session.tick(&mut host);
    let h = session.master().handle().unwrap();
    let actor = host.actor(h).unwrap();
    assert_eq!(actor.emote, None);
    assert_eq!(actor.pose, Pose::Crouching);
    assert_eq!(session.metrics().events_skipped, 1);
    assert_eq!(session.metrics().events_applied, 1);
}

#[test]
fn unbound_master_cannot_start() {
    let mut host = MockHost::new();
    let animation = solo(Timeline::unbound(straight_line(3, 1.0)));
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);
    assert_eq!(session.state(), PlaybackState::Idle);
    session.tick(&mut host);
    assert_eq!(host.spawn_count(), 0);
}

// ── Registry ────────────────────────────────────────────────────

#[test]
fn registry_drops_finished_sessions_and_notifies() {
    use std::sync::{Arc, Mutex};

    let mut host = MockHost::new();
    let stopped = Arc::new(Mutex::new(Vec::new()));
    let mut registry = PlaybackRegistry::new();

    let mut short = start(&solo(walk_timeline("minecraft:player", 2)), PlaybackConfig::default(), &mut host);
    let sink = stopped.clone();
    short.set_on_stop(move |id| sink.lock().unwrap().push(id));
    let short_id = registry.insert(short);
    let looping_id = registry.insert(start(
        &solo(walk_timeline("minecraft:player", 2)),
        PlaybackConfig::looping(),
        &mut host,
    ));

    let mut removed = Vec::new();
    for _ in 0..6 {
        removed.extend(registry.tick_all(&mut host));
    }

    assert_eq!(removed, vec![short_id]);
    assert_eq!(*stopped.lock().unwrap(), vec![short_id]);
    assert!(registry.get(looping_id).unwrap().is_playing());
    assert_eq!(host.live_count(), 1);
}

#[test]
fn seeking_a_stopped_session_leaks_no_actors() {
    let mut host = MockHost::new();
    let animation = Animation::new("duo", walk_timeline("minecraft:player", 5).shared())
        .with_secondary(walk_timeline("minecraft:zombie", 5).shared());
    let mut session = start(&animation, PlaybackConfig::default(), &mut host);
    session.tick(&mut host);
    session.stop(&mut host, true);

    session.change_location_by_tick(2, false, &mut host);
    let mut registry = PlaybackRegistry::new();
    let id = registry.insert(session);
    let removed = registry.tick_all(&mut host);

    assert_eq!(removed, vec![id]);
    assert_eq!(host.live_count(), 0);
}
