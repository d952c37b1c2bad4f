//! End-to-end contact sheet generation.

use pretty_assertions::assert_eq;

use hullsprite_cli::commands::audit::{generate_sheets, AuditOptions};
use hullsprite_tests::fixtures::ProjectFixture;

fn sprite_tree() -> ProjectFixture {
    let project = ProjectFixture::new();
    for i in 0..5 {
        project.add_sprite(
            &format!("sprites/amarr/frigate/ship{}.png", i),
            64,
            [200, 180, 40, 255],
        );
    }
    project.add_sprite("sprites/zeta/odd.png", 32, [90, 90, 90, 255]);
    project.add_file("sprites/zeta/broken.png", b"not a png");
    project.add_sprite("sprites/.cache/hidden.png", 16, [0, 0, 0, 255]);
    project
}

#[test]
fn test_audit_writes_faction_and_master_sheets() {
    let project = sprite_tree();
    let mut opts = AuditOptions::new(project.path().join("sprites"));
    opts.thumb = 64;
    opts.cols = 4;
    opts.all = true;

    let summary = generate_sheets(&opts).unwrap().unwrap();
    assert_eq!(summary.factions, 2);
    assert_eq!(summary.sprites, 7);

    let out = project.path().join("sprites/audit_sheets");
    let names: Vec<String> = summary
        .sheets
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["amarr_audit.png", "zeta_audit.png", "ALL_SPRITES_audit.png"]
    );

    let amarr = image::open(out.join("amarr_audit.png")).unwrap();
    assert_eq!(amarr.width(), 4 * 64 + 20);
    assert_eq!(amarr.height(), 40 + 2 * (64 + 20) + 20);

    let master = image::open(out.join("ALL_SPRITES_audit.png")).unwrap();
    assert_eq!(master.width(), 12 * 96 + 20);
    assert_eq!(master.height(), 20 + (30 + 112 + 10) * 2);
}

#[test]
fn test_audit_paginates_and_reruns_cleanly() {
    let project = sprite_tree();
    let mut opts = AuditOptions::new(project.path().join("sprites"));
    opts.thumb = 32;
    opts.cols = 2;
    opts.max_rows = Some(1);
    opts.exclude = vec!["zeta".to_string()];

    let first = generate_sheets(&opts).unwrap().unwrap();
    let names: Vec<String> = first
        .sheets
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["amarr_audit.png", "amarr_audit_p2.png", "amarr_audit_p3.png"]
    );

    // Sheets written under the sprite root are not picked up as sprites.
    let second = generate_sheets(&opts).unwrap().unwrap();
    assert_eq!(second.sprites, first.sprites);
}
