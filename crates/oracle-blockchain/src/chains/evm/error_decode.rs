use alloy::{
    contract::Error as ContractError,
    hex,
    primitives::Bytes,
    sol_types::decode_revert_reason,
};

fn spelunk_hex_revert(value: &serde_json::Value) -> Option<Bytes> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Object(o) => o.values().find_map(spelunk_hex_revert),
        _ => None,
    }
}

fn extract_revert_data_lossy(err: &ContractError) -> Option<Bytes> {
    if let Some(data) = err.as_revert_data() {
        return Some(data);
    }

    // Some nodes put the revert data into the JSON-RPC error payload in a
    // non-standard shape, or as a bare hex string.
    let ContractError::TransportError(transport) = err else {
        return None;
    };

    let payload = transport.as_error_resp()?;
    let raw = payload.data.as_ref()?;
    let s = raw.get().trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(s)
        && let Some(bytes) = spelunk_hex_revert(&value)
    {
        return Some(bytes);
    }

    s.trim_matches('"').parse().ok()
}

/// Human readable revert reason, when the error carries revert data.
///
/// The oracle contracts revert with `require` strings only, so decoding stops
/// at `Error(string)` and `Panic(uint256)`.
pub(crate) fn decode_contract_error(err: &ContractError) -> Option<String> {
    let revert_data = extract_revert_data_lossy(err)?;

    if let Some(reason) = decode_revert_reason(&revert_data) {
        return Some(reason);
    }

    if revert_data.len() >= 4 {
        return Some(format!(
            "Unknown custom error selector 0x{}",
            hex::encode(&revert_data[..4])
        ));
    }

    Some(format!("Unknown revert data 0x{}", hex::encode(revert_data)))
}
