use crate::GameDetail;
use crate::client::{ApiError, ApiResult, GameDetailEnvelope};

pub const LOCAL_WORLDCUP_ID: i64 = 0;

const LOCAL_WORLDCUP_JSON: &str = include_str!("../data/ramen_worldcup.json");

/// The bundled offline worldcup. `sort_order` is renumbered by position.
pub fn local_worldcup() -> ApiResult<GameDetail> {
    parse_detail(LOCAL_WORLDCUP_JSON).map(|mut detail| {
        for (index, item) in detail.items.iter_mut().enumerate() {
            item.sort_order = index as i32;
        }
        detail
    })
}

/// Parse a game-detail document, with or without the `{meta, data}` envelope.
pub fn parse_detail(json: &str) -> ApiResult<GameDetail> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ApiError::Other(format!("invalid game detail json: {e}")))?;
    let data = match value.get("meta") {
        Some(_) => value.get("data").cloned().unwrap_or_default(),
        None => value,
    };
    let envelope: GameDetailEnvelope = serde_json::from_value(data)
        .map_err(|e| ApiError::Other(format!("invalid game detail json: {e}")))?;
    Ok(envelope.into_detail())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameKind;

    #[test]
    fn embedded_worldcup_parses() {
        let detail = local_worldcup().expect("bundled worldcup should parse");
        assert_eq!(detail.game.id, LOCAL_WORLDCUP_ID);
        assert_eq!(detail.game.kind, GameKind::WorldCup);
        assert_eq!(detail.items.len(), 8);
        assert!(detail.is_playable());
        let orders: Vec<i32> = detail.items.iter().map(|c| c.sort_order).collect();
        assert_eq!(orders, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn parse_detail_accepts_the_meta_envelope() {
        let json = r#"{"meta":{"api":"games:detail","success":true,"code":"OK","message":null},
            "data":{"game":{"id":3,"title":"x","type":"WORLD_CUP","items":[
            {"id":1,"name":"a","file_name":"a.png","sort_order":0}]}}}"#;
        let detail = parse_detail(json).unwrap();
        assert_eq!(detail.game.id, 3);
        assert_eq!(detail.items.len(), 1);
    }
}
