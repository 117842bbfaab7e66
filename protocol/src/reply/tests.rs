#[cfg(test)]
mod tests {
    use crate::{
        ReplyAction, ReplyError, SpecialResource, parse_reply, scan_choice, scan_order,
    };

    #[test]
    fn test_parse_move_reply() {
        let reply = parse_reply(r#"{"why":"Earthquake is super effective","act":"move","idx":2}"#)
            .unwrap();

        assert_eq!(reply.action(), Some(ReplyAction::Move));
        assert_eq!(reply.idx, Some(2));
        assert_eq!(reply.justification(), "Earthquake is super effective");
        assert_eq!(reply.special_resource(), None);
    }

    #[test]
    fn test_parse_fenced_reply_with_prose() {
        let raw = "Sure! Here is my choice:\n```json\n{\"why\": \"bad matchup\", \"act\": \"switch\", \"idx\": \"3\"}\n```";
        let reply = parse_reply(raw).unwrap();

        assert_eq!(reply.action(), Some(ReplyAction::Switch));
        assert_eq!(reply.idx, Some(3));
    }

    #[test]
    fn test_parse_alternate_keys() {
        let reply =
            parse_reply(r#"{"reasoning":"go big","action":"Attack","index":1.0,"terastallize":"true"}"#)
                .unwrap();

        assert_eq!(reply.action(), Some(ReplyAction::Move));
        assert_eq!(reply.idx, Some(1));
        assert_eq!(reply.special_resource(), Some(SpecialResource::Terastallize));
    }

    #[test]
    fn test_special_as_string() {
        let reply = parse_reply(r#"{"act":"move","idx":4,"special":"Dynamax"}"#).unwrap();
        assert_eq!(reply.special_resource(), Some(SpecialResource::Dynamax));
    }

    #[test]
    fn test_parse_preview_order_variants() {
        let reply = parse_reply(r#"{"why":"lead with speed","order":"3, 1, 2"}"#).unwrap();
        assert_eq!(reply.order_indices(), vec![3, 1, 2]);

        let reply = parse_reply(r#"{"order":[2,1,3]}"#).unwrap();
        assert_eq!(reply.order_indices(), vec![2, 1, 3]);

        let reply = parse_reply(r#"{"order":213}"#).unwrap();
        assert_eq!(reply.order_indices(), vec![2, 1, 3]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_reply("   "), Err(ReplyError::Empty)));
        assert!(matches!(parse_reply("I pick move 2"), Err(ReplyError::NoObject)));
        assert!(matches!(
            parse_reply("{\"act\": \"move\", \"idx\": }"),
            Err(ReplyError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_scan_prefers_keyed_index() {
        let raw = r#"{"why": "turn 3 matters", "act": "move", "idx": 2"#;
        let choice = scan_choice(raw).unwrap();

        assert_eq!(choice.index, 2);
        assert_eq!(choice.action, Some(ReplyAction::Move));
    }

    #[test]
    fn test_scan_plain_text() {
        let choice = scan_choice("I will switch to slot 2 now").unwrap();
        assert_eq!(choice.action, Some(ReplyAction::Switch));
        assert_eq!(choice.index, 2);

        let choice = scan_choice("use move 4").unwrap();
        assert_eq!(choice.action, Some(ReplyAction::Move));
        assert_eq!(choice.index, 4);
    }

    #[test]
    fn test_scan_without_digits() {
        assert_eq!(scan_choice("no idea what to do"), None);
    }

    #[test]
    fn test_scan_order() {
        assert_eq!(scan_order(r#"{"why": "x", "order": "2 1 3"#), Some(vec![2, 1, 3]));
        assert_eq!(scan_order("order = [3,2,1]"), Some(vec![3, 2, 1]));
        assert_eq!(scan_order("lead with 1"), None);
    }
}
