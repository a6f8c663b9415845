use super::*;

#[test]
fn ranks_order_critical_first() {
    assert_eq!(Priority::Critical.rank(), 0);
    assert_eq!(Priority::High.rank(), 1);
    assert_eq!(Priority::Normal.rank(), 2);
}

#[test]
fn unknown_labels_are_normal() {
    assert_eq!(Priority::parse("critical"), Priority::Critical);
    assert_eq!(Priority::parse("HIGH"), Priority::High);
    assert_eq!(Priority::parse("normal"), Priority::Normal);
    assert_eq!(Priority::parse("urgent"), Priority::Normal);
    assert_eq!(Priority::parse(""), Priority::Normal);
    assert_eq!("critcal".parse::<Priority>().unwrap(), Priority::Normal);
    assert_eq!(Priority::default(), Priority::Normal);
}

#[test]
fn serde_round_trips_labels_and_tolerates_typos() {
    assert_eq!(
        serde_json::to_string(&Priority::Critical).unwrap(),
        "\"critical\""
    );
    let p: Priority = serde_json::from_str("\"high\"").unwrap();
    assert_eq!(p, Priority::High);
    let p: Priority = serde_json::from_str("\"hgih\"").unwrap();
    assert_eq!(p, Priority::Normal);
}

#[test]
fn demotion_saturates() {
    assert_eq!(Priority::Critical.demoted(), Priority::High);
    assert_eq!(Priority::High.demoted(), Priority::Normal);
    assert_eq!(Priority::Normal.demoted(), Priority::Normal);
}
