use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// In-memory zip with the given `(name, body)` entries, in order.
pub fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub const ORDER_X: &str = r#"{
    "name": "X",
    "customer": {"id": 10, "email": null},
    "products": [{
        "name": "P1", "price": 5, "quantity": 1,
        "items": [
            {"code": "I1", "name": "Item1", "price": 2, "quantity": 3},
            {"code": "I2", "name": "Item2", "price": 1, "quantity": 1}
        ]
    }]
}"#;

pub const ORDER_Y: &str = r#"{
    "name": "Y",
    "channel": "store",
    "products": [
        {"name": "P2", "price": 9, "quantity": 2, "items": [{"code": "I3", "name": "Item3", "price": 9, "quantity": 2}]}
    ]
}"#;
