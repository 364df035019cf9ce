use crate::{CollectorError, Force, Gesture, Hand, LabelStyle, SessionLabels};

/// WHAT: Labels parse from both localized and neutral spellings
/// WHY: Existing on-device data uses localized names, new hosts may not
#[test]
fn given_either_spelling_when_parsing_labels_then_same_variant() {
    // Given/When/Then: Each family accepts both spellings
    assert_eq!("右手".parse::<Hand>().unwrap(), Hand::Right);
    assert_eq!("left".parse::<Hand>().unwrap(), Hand::Left);
    assert_eq!("抖腕[负]".parse::<Gesture>().unwrap(), Gesture::WristShake);
    assert_eq!("double_tap".parse::<Gesture>().unwrap(), Gesture::DoubleTap);
    assert_eq!("重".parse::<Force>().unwrap(), Force::Heavy);
    assert_eq!(" light ".parse::<Force>().unwrap(), Force::Light);
}

/// WHAT: Unknown labels produce InvalidLabel naming the family
/// WHY: The gesture set is closed
#[test]
fn given_unknown_gesture_when_parsing_then_invalid_label_error() {
    // Given: A label outside the 7-gesture set
    let result = "wave".parse::<Gesture>();

    // Then: InvalidLabel for the gesture family
    assert!(matches!(
        result,
        Err(CollectorError::InvalidLabel { kind: "gesture", .. })
    ));
}

/// WHAT: The gesture set has 7 labels, 3 of them positive
/// WHY: Datasets are split into target and distractor gestures
#[test]
fn given_gesture_set_when_counting_polarity_then_three_positive_of_seven() {
    // Given/When: Counting positive gestures
    let positive = Gesture::ALL.iter().filter(|g| g.is_positive()).count();

    // Then: 7 labels total, 3 positive, and localized labels encode polarity
    assert_eq!(Gesture::ALL.len(), 7);
    assert_eq!(positive, 3);
    for gesture in Gesture::ALL {
        let marker = if gesture.is_positive() { "[正]" } else { "[负]" };
        assert!(gesture.label(LabelStyle::Localized).ends_with(marker));
    }
}

/// WHAT: Notes are trimmed, path separators replaced, blanks dropped
/// WHY: The note becomes part of a single directory name
#[test]
fn given_notes_with_separators_when_building_labels_then_sanitized() {
    // Given/When: Labels with awkward notes
    let slashed = SessionLabels::new(Hand::Left, Gesture::Fist, Force::Light, Some(" a/b\\c "));
    let blank = SessionLabels::new(Hand::Left, Gesture::Fist, Force::Light, Some("   "));

    // Then: Separators become dashes, blank notes disappear
    assert_eq!(slashed.note.as_deref(), Some("a-b-c"));
    assert_eq!(blank.note, None);
}

/// WHAT: Hand markers cover both spellings
/// WHY: Catalog discovery depends on them
#[test]
fn given_hand_markers_when_listing_then_four_underscore_delimited_markers() {
    // When: Collecting markers
    let markers: Vec<String> = Hand::markers().collect();

    // Then: Both hands in both styles
    assert_eq!(markers, vec!["_左手_", "_left_", "_右手_", "_right_"]);
}
