#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Boundary conditions for cards, messages, cubes and pack scheduling

use std::io::Write;

use booster_draft::draft::{
    partition, rotate, validate_groups, CardRef, Cube, CubePackSource, GroupRotation, Pack,
    PackGroup, PackSource,
};
use booster_draft::error::DraftError;
use booster_draft::protocol::message::{Message, NEXT_PACK, STOP_DRAFTING};

fn pack(ids: &[&str]) -> Pack {
    Pack::from_ids(ids.iter().copied()).unwrap()
}

fn card(id: &str) -> CardRef {
    CardRef::new(id).unwrap()
}

// ============================================================================
// CARD REFERENCES AND PACKS
// ============================================================================

#[test]
fn test_card_ref_rejects_wire_breaking_ids() {
    for bad in ["", "two words", "tab\there", NEXT_PACK, STOP_DRAFTING] {
        assert!(
            matches!(CardRef::new(bad), Err(DraftError::Protocol(_))),
            "{bad:?} should be rejected"
        );
    }
    assert_eq!(card("386616").as_str(), "386616");
}

#[test]
fn test_pack_refuses_duplicate_cards() {
    assert!(matches!(
        Pack::from_ids(["1", "2", "1"]),
        Err(DraftError::Configuration(_))
    ));
}

#[test]
fn test_take_preserves_order_of_remaining_cards() {
    let mut p = pack(&["1", "2", "3", "4"]);
    assert_eq!(p.take(&card("2")).unwrap(), card("2"));
    assert_eq!(p.cards(), &[card("1"), card("3"), card("4")]);
    assert!(matches!(p.take(&card("2")), Err(DraftError::Protocol(_))));
}

// ============================================================================
// MESSAGES
// ============================================================================

#[test]
fn test_offer_with_sentinel_looking_card_is_impossible() {
    // a single-card offer could otherwise be mistaken for a sentinel
    assert!(CardRef::new(NEXT_PACK).is_err());
    assert_eq!(
        Message::parse_server(NEXT_PACK).unwrap(),
        Message::RoundBoundary
    );
}

#[test]
fn test_single_card_offer() {
    assert_eq!(
        Message::parse_server("77").unwrap(),
        Message::PackOffer(vec![card("77")])
    );
    assert_eq!(Message::offer(&pack(&["77"])).to_wire(), "77");
}

#[test]
fn test_pick_tolerates_surrounding_whitespace() {
    assert_eq!(Message::parse_pick(" 12\n").unwrap(), Message::Pick(card("12")));
}

#[test]
fn test_announce_round_trips_unicode_names() {
    let name = "Draft de l'été ✨";
    let wire = Message::Announce(name.to_string()).to_wire();
    assert_eq!(
        Message::parse_announce(&wire).unwrap(),
        Message::Announce(name.to_string())
    );
}

// ============================================================================
// SCHEDULING
// ============================================================================

#[test]
fn test_partition_rejects_uneven_split() {
    let packs = vec![pack(&["1"]), pack(&["2"]), pack(&["3"])];
    assert!(matches!(
        partition(packs, 2),
        Err(DraftError::Configuration(_))
    ));
}

#[test]
fn test_partition_rejects_zero_players_and_no_packs() {
    assert!(partition(vec![pack(&["1"])], 0).is_err());
    assert!(partition(Vec::new(), 2).is_err());
}

#[test]
fn test_partition_deals_round_robin() {
    let packs = (0..4).map(|i| pack(&[i.to_string().as_str()])).collect();
    let groups = partition(packs, 2).unwrap();
    assert_eq!(groups[0].packs(), &[pack(&["0"]), pack(&["2"])]);
    assert_eq!(groups[1].packs(), &[pack(&["1"]), pack(&["3"])]);
}

#[test]
fn test_rotate_wraps_around() {
    let group = PackGroup::new(vec![pack(&["a"]), pack(&["b"]), pack(&["c"])]);
    let held: Vec<_> = rotate(&group, 2).into_iter().cloned().collect();
    assert_eq!(held, vec![pack(&["c"]), pack(&["a"]), pack(&["b"])]);
}

#[test]
fn test_validate_groups_catches_every_mismatch() {
    let good = PackGroup::new(vec![pack(&["1", "2"]), pack(&["3", "4"])]);
    assert!(validate_groups(std::slice::from_ref(&good), 2).is_ok());

    let short = PackGroup::new(vec![pack(&["1", "2"])]);
    let mixed = PackGroup::new(vec![pack(&["1", "2"]), pack(&["3"])]);
    let empty = PackGroup::new(vec![Pack::default(), Pack::default()]);

    for groups in [vec![good.clone(), short], vec![mixed], vec![empty], Vec::new()] {
        assert!(matches!(
            validate_groups(&groups, 2),
            Err(DraftError::Configuration(_))
        ));
    }
    assert!(validate_groups(&[good], 0).is_err());
}

#[test]
fn test_round_cannot_close_until_all_slots_pick() {
    let mut rotation = GroupRotation::new(PackGroup::new(vec![
        pack(&["1", "2"]),
        pack(&["3", "4"]),
    ]));
    rotation.apply_pick(0, &card("1")).unwrap();
    assert!(matches!(
        rotation.finish_round(),
        Err(DraftError::Protocol(_))
    ));
    assert!(rotation.apply_pick(0, &card("2")).is_err());
    assert!(rotation.apply_pick(5, &card("3")).is_err());

    rotation.apply_pick(1, &card("3")).unwrap();
    assert!(rotation.finish_round().is_ok());
    assert_eq!(rotation.shift(), 1);
    assert_eq!(rotation.assigned_pack(0), Some(&pack(&["4"])));
}

// ============================================================================
// CUBES
// ============================================================================

#[test]
fn test_load_json_cube_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vintage.json");
    std::fs::write(
        &path,
        r#"{"name": "Vintage", "card_ids": ["100", "101", "102"], "card_info": {}}"#,
    )
    .unwrap();

    let cube = Cube::load(&path).unwrap();
    assert_eq!(cube.name, "Vintage");
    assert_eq!(cube.cards(), &[card("100"), card("101"), card("102")]);
}

#[test]
fn test_load_plain_list_uses_file_stem() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "1\n\n  2  \n3").unwrap();

    let cube = Cube::load(file.path()).unwrap();
    assert_eq!(cube.len(), 3);
    let stem = file.path().file_stem().unwrap().to_string_lossy();
    assert_eq!(cube.name, stem);
}

#[test]
fn test_load_missing_or_malformed_cube() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Cube::load(dir.path().join("nope.json")),
        Err(DraftError::Configuration(_))
    ));

    let broken = dir.path().join("broken.cube");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        Cube::load(&broken),
        Err(DraftError::Configuration(_))
    ));
}

#[test]
fn test_cube_source_feeds_partition() {
    let cube = Cube::new("small", (0..12).map(|i| i.to_string())).unwrap();
    let mut source = CubePackSource::new(cube, 3).with_seed(1);
    let groups = partition(source.generate_packs(4).unwrap(), 2).unwrap();
    assert!(validate_groups(&groups, 2).is_ok());
}

#[test]
fn test_zero_pack_size_source() {
    let cube = Cube::new("small", ["1", "2"]).unwrap();
    assert!(CubePackSource::new(cube, 0).generate_packs(1).is_err());
}
