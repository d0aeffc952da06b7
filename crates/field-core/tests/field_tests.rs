// Host-side tests for frame orchestration: initial population, scheduler
// ramp, asset hand-off and the renderer-facing frame snapshot.

mod common;

use common::*;
use field_core::{
    AssetError, Field, FieldConfig, FieldError, HeartInstanceData, HeartTemplate, MessageList,
    RasterConfig, TextInstance, ViewSample,
};
use glam::{Vec2, Vec3};

const DT: f32 = 1.0 / 60.0;

fn field_with(cfg: FieldConfig, seed: u64) -> Field {
    Field::new(cfg, Box::new(BlockShaper), messages(), seed, &ViewSample::default()).unwrap()
}

fn settled_config(count: usize) -> FieldConfig {
    let mut cfg = small_config();
    cfg.text.count = count;
    cfg.text.initial_batch = count;
    cfg
}

#[test]
fn empty_message_list_is_rejected() {
    let err = MessageList::new(Vec::<String>::new()).err();
    assert!(matches!(err, Some(FieldError::NoMessages)));
}

#[test]
fn initial_batch_then_scheduler_ramp() {
    let mut field = field_with(small_config(), 1);
    assert_eq!(field.text_pool().len(), 60);
    assert_eq!(field.scheduler().pending_spawns(), 220);

    let mut frames = 0;
    while field.text_pool().len() < 280 {
        let stats = field.frame(DT, frames as f32 * DT, &ViewSample::default()).stats;
        assert!(stats.spawned <= 24);
        frames += 1;
        assert!(frames < 50);
    }
    assert_eq!(frames, 10); // ceil(220 / 24)
    assert_eq!(field.scheduler().pending_spawns(), 0);
}

#[test]
fn initial_batch_fills_the_visible_band() {
    let field = field_with(small_config(), 2);
    for (_, p) in field.text_pool().iter() {
        assert!(p.position.y >= -170.0 && p.position.y <= 170.0 + 40.0);
    }
}

#[test]
fn density_follows_camera_distance() {
    let mut field = field_with(settled_config(30), 3);
    let near = field.frame(DT, 0.0, &ViewSample::default()).stats;
    assert_eq!(near.text_total, 30);
    assert_eq!(near.text_visible, 28); // floor(30 * 0.96)

    let far = ViewSample::new(Vec3::new(0.0, 0.0, 10_000.0), Vec3::ZERO);
    let stats = field.frame(DT, DT, &far).stats;
    assert_eq!(stats.text_visible, 6); // floor(30 * 0.2)
    assert!((stats.spread - 1080.0 * 1.9).abs() < 1e-2);
    let visible = field.text_pool().iter().filter(|(_, p)| p.visible).count();
    assert_eq!(visible, 6);
}

#[test]
fn glyph_arrival_refreshes_existing_rasters() {
    let mut cfg = settled_config(1);
    cfg.raster = RasterConfig::default();
    let messages = MessageList::new(["A :heart:"]).unwrap();
    // camera on its target: the whole pool is active
    let view = ViewSample::new(Vec3::ZERO, Vec3::ZERO);
    let mut field = Field::new(cfg, Box::new(BlockShaper), messages, 4, &view).unwrap();

    let id = field.text_pool().ids().next().unwrap();
    let before = field.text_pool().get(id).unwrap().raster().clone();
    field.mark_all_uploaded();

    field.glyph_completer().complete("heart-text", Ok(glyph_outline()));
    let frame = field.frame(DT, 0.0, &view);
    assert_eq!(frame.stats.refreshed, 1);
    assert_eq!(frame.uploads, &[id]);

    let p = field.text_pool().get(id).unwrap();
    let after = p.raster();
    for x in 0..450 {
        for y in 0..after.height() {
            assert_eq!(before.pixel(x, y), after.pixel(x, y));
        }
    }
    let blank: u32 = (540..620).map(|x| column_alpha(&before, x)).sum();
    let stamped: u32 = (540..620).map(|x| column_alpha(after, x)).sum();
    assert_eq!(blank, 0);
    assert!(stamped > 0);
}

#[test]
fn heart_template_populates_on_next_frame() {
    let mut field = field_with(settled_config(10), 5);
    field.complete_heart_template(HeartTemplate::from_svg(HEART_SVG.as_bytes()));
    assert!(field.hearts().is_empty());

    let frame = field.frame(DT, 0.0, &ViewSample::default());
    assert_eq!(frame.stats.hearts, 48);
    assert_eq!(frame.hearts.len(), 96); // two parts per heart
    assert_eq!(frame.heart_bytes().len(), 96 * 48);
    let shapes: Vec<u32> = frame.hearts.iter().take(2).map(|h| h.shape).collect();
    assert_eq!(shapes, vec![0, 1]);
}

#[test]
fn failed_heart_template_leaves_hearts_empty() {
    let mut field = field_with(settled_config(10), 6);
    field.complete_heart_template(Err(AssetError::NotFound("shape/heart.svg".into())));
    let frame = field.frame(DT, 0.0, &ViewSample::default());
    assert_eq!(frame.stats.hearts, 0);
    assert!(frame.hearts.is_empty());
}

#[test]
fn uploads_clear_once_acknowledged() {
    let mut field = field_with(settled_config(20), 7);
    let first = field.frame(0.0, 0.0, &ViewSample::default()).uploads.len();
    assert_eq!(first, 19); // every visible raster is new

    field.mark_all_uploaded();
    let frame = field.frame(0.0, 0.0, &ViewSample::default());
    assert!(frame.uploads.is_empty());

    let id = field.text_pool().ids().next().unwrap();
    assert!(!field.text_pool().get(id).unwrap().needs_upload());
}

#[test]
fn instance_records_match_visible_particles() {
    let mut field = field_with(settled_config(12), 8);
    let frame = field.frame(DT, 1.0, &ViewSample::default());
    assert_eq!(std::mem::size_of::<TextInstance>(), 48);
    assert_eq!(std::mem::size_of::<HeartInstanceData>(), 48);
    assert_eq!(frame.text.len(), frame.stats.text_visible);
    assert_eq!(frame.text_bytes().len(), frame.text.len() * 48);

    let records: Vec<TextInstance> = frame.text.to_vec();
    let size = [field.config().text.plane_width, field.config().text.plane_height];
    for rec in &records {
        assert_eq!(rec.size, size);
        assert!((0.0..=1.0).contains(&rec.color[3]));
        assert!(rec.scale > 0.0);
        assert!((rec.slot as usize) < 12);
    }
    for (t, (_, p)) in records.iter().zip(field.text_pool().iter().filter(|(_, p)| p.visible)) {
        assert_eq!(t.position, p.position.to_array());
    }
}

#[test]
fn wheel_and_pointer_drive_group_transform() {
    let mut field = field_with(settled_config(4), 9);
    field.on_wheel(240.0);
    field.on_pointer(Vec2::new(1.0, 0.0));
    for i in 0..199 {
        field.frame(0.0, i as f32 * DT, &ViewSample::default());
    }
    let group = field.frame(0.0, 199.0 * DT, &ViewSample::default()).group;
    assert!((group.z_offset - -80.0).abs() < 0.05);
    assert!((group.rotation.y - 0.08).abs() < 1e-3);
    assert!(group.rotation.x.abs() < 1e-6);

    let m = group.matrix();
    let origin = m.transform_point3(Vec3::ZERO);
    assert!((origin.z - group.z_offset).abs() < 1e-5);
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed: u64| -> Vec<Vec3> {
        let mut field = field_with(small_config(), seed);
        for i in 0..30 {
            field.frame(DT, i as f32 * DT, &ViewSample::default());
        }
        field.text_pool().iter().map(|(_, p)| p.position).collect()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn mobile_profile_is_smaller() {
    let mobile = FieldConfig::mobile();
    let desktop = FieldConfig::default();
    assert!(mobile.text.count < desktop.text.count);
    assert!(mobile.hearts.count < desktop.hearts.count);
    assert!(mobile.stars.count < desktop.stars.count);
    assert!(mobile.view.x_range < desktop.view.x_range);
    assert!(mobile.raster.font_max < desktop.raster.font_max);
}
