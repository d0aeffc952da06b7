// Host-side tests for the heart template, heart pool motion and the
// background starfield.

mod common;

use common::*;
use field_core::{
    AssetError, DepthConfig, HeartConfig, HeartFrame, HeartParticlePool, HeartTemplate,
    Starfield, StarfieldConfig,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn template() -> Arc<HeartTemplate> {
    Arc::new(HeartTemplate::from_svg(HEART_SVG.as_bytes()).unwrap())
}

fn heart_frame(mix: f32) -> HeartFrame {
    HeartFrame {
        top_y: 272.0,
        bottom_y: -400.0,
        spread: 1080.0,
        depth_offset: 0.0,
        mix,
    }
}

#[test]
fn template_parts_are_centered_with_extrusion() {
    let t = template();
    assert_eq!(t.shapes.len(), 2);
    for shape in &t.shapes {
        let (min, max) = field_core::assets::polyline_bounds(std::slice::from_ref(&shape.contour));
        assert!(((min + max) * 0.5).length() < 1e-3);
    }
    assert_eq!(t.extrude.depth, 3.2);
    assert_eq!(t.extrude.bevel_segments, 12);
    assert_eq!(t.extrude.curve_segments, 48);
}

#[test]
fn template_without_closed_shapes_is_rejected() {
    let lines = vec![vec![Vec2::ZERO, Vec2::ONE]];
    assert!(matches!(HeartTemplate::from_contours(lines), Err(AssetError::Empty)));
    assert!(HeartTemplate::from_svg(NOT_SVG.as_bytes()).is_err());
}

#[test]
fn populate_clones_template_once() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut pool = HeartParticlePool::new(HeartConfig::default(), DepthConfig::default());
    assert!(pool.is_empty());
    pool.populate(template(), &mut rng, 1080.0, 170.0);
    assert_eq!(pool.len(), 48);

    for h in pool.iter() {
        assert!(h.position.x.abs() <= 1080.0 * 0.9);
        assert!(h.position.y.abs() <= 170.0);
        assert!((-360.0..=360.0).contains(&h.position.z));
        assert!((0.7..=1.4).contains(&h.scale));
        assert!((3.5..=7.0).contains(&h.speed));
        assert!((0.1..=0.35).contains(&h.spin_speed));
        assert_eq!(h.rotation, Vec3::new(0.0, 0.0, std::f32::consts::PI));
        assert_eq!(h.parts.len(), 2);
    }

    // a second template is ignored
    pool.populate(template(), &mut rng, 1080.0, 170.0);
    assert_eq!(pool.len(), 48);
}

#[test]
fn hearts_fall_spin_and_share_one_color() {
    let mut rng = StdRng::seed_from_u64(22);
    let cfg = HeartConfig {
        color_b: Vec3::new(0.0, 0.0, 1.0),
        ..HeartConfig::default()
    };
    let mut pool = HeartParticlePool::new(cfg, DepthConfig::default());
    pool.populate(template(), &mut rng, 1080.0, 170.0);
    let before: Vec<(f32, f32)> = pool.iter().map(|h| (h.position.y, h.rotation.y)).collect();

    let recycled = pool.advance(0.1, 1.0, &heart_frame(0.5), &mut rng);
    assert_eq!(recycled, 0);

    let expected = Vec3::new(1.0, 0.231, 0.310).lerp(Vec3::new(0.0, 0.0, 1.0), 0.5);
    for (h, (y, spin)) in pool.iter().zip(before) {
        assert!((y - h.position.y - h.speed * 0.1 * 9.0).abs() < 1e-3);
        assert!((h.rotation.y - spin - h.spin_speed * 0.1 * 0.8).abs() < 1e-5);
        for part in &h.parts {
            assert!((part.color - expected).length() < 1e-5);
            assert!(part.opacity > 0.9 && part.opacity <= 1.0);
        }
    }
}

#[test]
fn fallen_hearts_recycle_by_position_only() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut pool = HeartParticlePool::new(HeartConfig::default(), DepthConfig::default());
    pool.populate(template(), &mut rng, 1080.0, 170.0);
    let before: Vec<(f32, f32)> = pool.iter().map(|h| (h.scale, h.speed)).collect();

    let frame = HeartFrame {
        top_y: 2000.0,
        bottom_y: 1500.0,
        spread: 400.0,
        ..heart_frame(0.0)
    };
    let recycled = pool.advance(1.0 / 60.0, 0.0, &frame, &mut rng);
    assert_eq!(recycled, 48);
    assert_eq!(pool.recycles(), 48);

    for (h, (scale, speed)) in pool.iter().zip(before) {
        assert!(h.position.y >= 2000.0 + 120.0 && h.position.y <= 2000.0 + 320.0);
        assert!(h.position.x.abs() <= 400.0 * 0.9);
        assert!((-360.0..=360.0).contains(&h.position.z));
        assert_eq!(h.scale, scale);
        assert_eq!(h.speed, speed);
    }
}

#[test]
fn far_hearts_fade() {
    let mut rng = StdRng::seed_from_u64(24);
    let mut pool = HeartParticlePool::new(HeartConfig::default(), DepthConfig::default());
    pool.populate(template(), &mut rng, 1080.0, 170.0);
    let far = HeartFrame {
        depth_offset: 24_000.0,
        ..heart_frame(0.0)
    };
    pool.advance(0.0, 0.0, &far, &mut rng);
    for h in pool.iter() {
        for part in &h.parts {
            assert!((part.opacity - 0.6).abs() < 1e-5);
        }
    }
}

#[test]
fn hearts_fade_out_near_the_bottom() {
    let mut rng = StdRng::seed_from_u64(27);
    let mut pool = HeartParticlePool::new(HeartConfig::default(), DepthConfig::default());
    pool.populate(template(), &mut rng, 1080.0, 170.0);
    // every heart sits inside [-170, 170]; put the threshold 60 below the lowest
    let lowest = pool.iter().map(|h| h.position.y).fold(f32::MAX, f32::min);
    let frame = HeartFrame {
        bottom_y: lowest - 60.0,
        ..heart_frame(0.0)
    };
    let recycled = pool.advance(0.0, 0.0, &frame, &mut rng);
    assert_eq!(recycled, 0);

    for h in pool.iter() {
        let depth_t = (h.position.z.abs() / 12000.0).clamp(0.0, 1.0);
        let full = 0.6 + 0.4 * (1.0 - depth_t);
        let fade = ((h.position.y - frame.bottom_y) / 120.0).clamp(0.0, 1.0);
        for part in &h.parts {
            assert!((part.opacity - full * fade).abs() < 1e-4);
        }
    }
    let low = pool.iter().find(|h| h.position.y == lowest).expect("lowest heart");
    let full = 0.6 + 0.4 * (1.0 - (low.position.z.abs() / 12000.0).clamp(0.0, 1.0));
    assert!((low.parts[0].opacity - full * 0.5).abs() < 1e-4);
}

#[test]
fn starfield_points_fill_the_volume() {
    let mut rng = StdRng::seed_from_u64(25);
    let stars = Starfield::generate(StarfieldConfig::default(), &mut rng);
    assert_eq!(stars.len(), 2800);
    for p in stars.positions() {
        assert!(p.x.abs() <= 2400.0 && p.y.abs() <= 2400.0);
        assert!((-24000.0..=2000.0).contains(&p.z));
    }
    assert_eq!(stars.vertex_bytes().len(), 2800 * 12);
}

#[test]
fn starfield_sway_is_a_function_of_time() {
    let mut rng = StdRng::seed_from_u64(26);
    let mut stars = Starfield::generate(StarfieldConfig::default(), &mut rng);
    let r0 = stars.advance(0.0);
    assert!((r0 - Vec2::new(0.05, 0.0)).length() < 1e-6);

    let t = 10.0f32;
    let r = stars.advance(t);
    assert!((r.x - (t * 0.04).cos() * 0.05).abs() < 1e-6);
    assert!((r.y - (t * 0.05).sin() * 0.08).abs() < 1e-6);
    assert_eq!(stars.advance(t), r);
    assert_eq!(stars.rotation(), r);
}
