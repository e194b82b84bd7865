// src/common/normalizer.rs

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

/// Describe cómo reconocer y tipar los registros de una colección del backend.
#[derive(Debug, Clone, Copy)]
pub struct RecordShape {
    /// Campo obligatorio que identifica un registro (ej: `id_producto`)
    pub discriminator: &'static str,
    /// Llaves plurales que el backend usa como sobre (ej: `products`, `productos`)
    pub plural_keys: &'static [&'static str],
    /// Campos que siempre deben quedar como número
    pub numeric_fields: &'static [&'static str],
}

/// Extrae la lista de registros sin importar el sobre que usó el backend.
///
/// Orden de prioridad:
/// 1. arreglo directo
/// 2. `data` como arreglo (cubre también `{ success, data }`)
/// 3. una llave plural conocida con arreglo
/// 4. los valores del objeto que sean objetos con el discriminador
/// 5. vacío
///
/// Nunca falla: la ausencia de datos es una lista vacía.
pub fn normalize(payload: &Value, shape: &RecordShape) -> Vec<Value> {
    extract_list(payload, shape)
        .into_iter()
        .map(|record| coerce_record(record, shape))
        .collect()
}

/// Extrae un solo registro (info de sucursal, detalle de reporte).
pub fn normalize_one(payload: &Value, shape: &RecordShape, singular_keys: &[&str]) -> Option<Value> {
    let holds_record =
        |v: &Value| v.as_object().is_some_and(|m| m.contains_key(shape.discriminator));

    if holds_record(payload) {
        return Some(coerce_record(payload.clone(), shape));
    }

    let candidate = std::iter::once("data")
        .chain(singular_keys.iter().copied())
        .filter_map(|key| payload.get(key))
        .find(|v| holds_record(*v));

    match candidate {
        Some(record) => Some(coerce_record(record.clone(), shape)),
        None => normalize(payload, shape).into_iter().next(),
    }
}

/// Convierte registros normalizados en entidades tipadas.
/// Un registro que no se puede tipar se descarta con un aviso.
pub fn decode_records<T: DeserializeOwned>(records: Vec<Value>, shape: &RecordShape) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<T>(record) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("⚠️ Registro descartado ({}): {}", shape.discriminator, e);
                None
            }
        })
        .collect()
}

/// `normalize_one` + tipado. Aquí un registro inválido sí es error.
pub fn decode_one<T: DeserializeOwned>(
    payload: &Value,
    shape: &RecordShape,
    singular_keys: &[&str],
) -> Result<Option<T>, serde_json::Error> {
    normalize_one(payload, shape, singular_keys)
        .map(serde_json::from_value)
        .transpose()
}

fn extract_list(payload: &Value, shape: &RecordShape) -> Vec<Value> {
    if let Value::Array(items) = payload {
        return items.clone();
    }

    let Value::Object(map) = payload else {
        return Vec::new();
    };

    if let Some(Value::Array(items)) = map.get("data") {
        return items.clone();
    }

    for key in shape.plural_keys {
        if let Some(Value::Array(items)) = map.get(*key) {
            return items.clone();
        }
    }

    map.values()
        .filter(|v| v.as_object().is_some_and(|m| m.contains_key(shape.discriminator)))
        .cloned()
        .collect()
}

fn coerce_record(mut record: Value, shape: &RecordShape) -> Value {
    if let Value::Object(fields) = &mut record {
        coerce_numeric_fields(fields, shape.numeric_fields);
    }
    record
}

fn coerce_numeric_fields(fields: &mut Map<String, Value>, numeric_fields: &[&str]) {
    for name in numeric_fields {
        if let Some(value) = fields.get_mut(*name) {
            *value = Value::Number(coerce_number(value));
        }
    }
}

/// Valores enteros (`3`, `"3"`, `1.0`, `"2.0"`) quedan enteros, el resto como
/// flotante finito; todo lo que no se pueda leer queda en 0.
pub fn coerce_number(value: &Value) -> Number {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().map(from_float).unwrap_or_else(|| n.clone()),
        Value::Number(n) => n.clone(),
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(int) = raw.parse::<i64>() {
                return Number::from(int);
            }
            raw.parse::<f64>().map(from_float).unwrap_or_else(|_| Number::from(0))
        }
        // 0 entero: sirve tanto para campos f64 como para ids i64
        _ => Number::from(0),
    }
}

// Columnas DECIMAL llegan como 1.0: un id así debe seguir siendo i64
fn from_float(f: f64) -> Number {
    if !f.is_finite() {
        return Number::from(0);
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Number::from(f as i64);
    }
    Number::from_f64(f).unwrap_or_else(|| Number::from(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PRODUCT: RecordShape = RecordShape {
        discriminator: "id_producto",
        plural_keys: &["products", "productos"],
        numeric_fields: &["id_producto", "precio"],
    };

    fn records() -> Value {
        json!([
            { "id_producto": 1, "descripcion": "Tortilla", "precio": "12.50" },
            { "id_producto": 2, "descripcion": "Masa", "precio": 30 }
        ])
    }

    #[test]
    fn every_envelope_yields_the_same_records() {
        let bare = normalize(&records(), &PRODUCT);
        let data = normalize(&json!({ "data": records() }), &PRODUCT);
        let success = normalize(&json!({ "success": true, "data": records(), "count": 2 }), &PRODUCT);
        let plural = normalize(&json!({ "products": records() }), &PRODUCT);
        let spanish = normalize(&json!({ "productos": records() }), &PRODUCT);

        assert_eq!(bare.len(), 2);
        assert_eq!(bare, data);
        assert_eq!(bare, success);
        assert_eq!(bare, plural);
        assert_eq!(bare, spanish);
    }

    #[test]
    fn falls_back_to_object_values_with_discriminator() {
        let payload = json!({
            "a": { "id_producto": 7, "precio": "1" },
            "meta": { "page": 1 },
            "total": 1
        });
        let out = normalize(&payload, &PRODUCT);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id_producto"], json!(7));
    }

    #[test]
    fn unrecognized_payloads_are_empty() {
        assert!(normalize(&json!(null), &PRODUCT).is_empty());
        assert!(normalize(&json!("texto"), &PRODUCT).is_empty());
        assert!(normalize(&json!({ "success": false, "message": "sin datos" }), &PRODUCT).is_empty());
    }

    #[test]
    fn numeric_strings_become_numbers() {
        let out = normalize(&json!({ "data": [{ "id_producto": "3", "precio": "12.50" }] }), &PRODUCT);
        assert_eq!(out[0]["precio"].as_f64(), Some(12.5));
        assert_eq!(out[0]["id_producto"].as_i64(), Some(3));
    }

    #[test]
    fn integral_floats_keep_integer_ids() {
        let payload = json!({ "data": [
            { "id_producto": 1.0, "precio": "5" },
            { "id_producto": "2.0", "precio": 6.0 },
            { "id_producto": 3, "precio": 7.25 }
        ]});
        let out = normalize(&payload, &PRODUCT);

        let ids: Vec<_> = out.iter().map(|r| r["id_producto"].as_i64()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(out[1]["precio"].as_f64(), Some(6.0));
        assert_eq!(out[2]["precio"].as_f64(), Some(7.25));
    }

    #[test]
    fn unparsable_numbers_become_zero_never_nan() {
        let payload = json!([
            { "id_producto": 1, "precio": "doce" },
            { "id_producto": 2, "precio": "NaN" },
            { "id_producto": 3, "precio": null },
            { "id_producto": 4, "precio": "inf" }
        ]);
        for record in normalize(&payload, &PRODUCT) {
            let precio = record["precio"].as_f64().expect("precio numérico");
            assert_eq!(precio, 0.0);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize(&json!({ "success": true, "data": records() }), &PRODUCT);
        let twice = normalize(&Value::Array(once.clone()), &PRODUCT);
        assert_eq!(once, twice);
    }

    #[test]
    fn single_record_shapes() {
        const BRANCH: RecordShape = RecordShape {
            discriminator: "id_sucursal",
            plural_keys: &["sucursales"],
            numeric_fields: &["id_sucursal"],
        };

        let direct = json!({ "id_sucursal": "5", "nombre": "Centro" });
        let wrapped = json!({ "success": true, "data": { "id_sucursal": 5, "nombre": "Centro" } });
        let keyed = json!({ "sucursal": { "id_sucursal": 5, "nombre": "Centro" } });
        let listed = json!({ "sucursales": [{ "id_sucursal": 5, "nombre": "Centro" }] });

        for payload in [direct, wrapped, keyed, listed] {
            let one = normalize_one(&payload, &BRANCH, &["sucursal"]).expect("registro");
            assert_eq!(one["id_sucursal"].as_i64(), Some(5));
        }

        assert!(normalize_one(&json!({ "success": true }), &BRANCH, &["sucursal"]).is_none());
    }
}
