use std::{env, process};

use shelly::tokio::Shelly1;

#[tokio::main]
async fn main() {
    let device = match env::args().nth(1) {
        Some(host) => Shelly1::new(&host),
        None => Shelly1::factory_default(),
    };

    let result = match device {
        Ok(device) => device.status().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(status) => println!("{}", serde_json::Value::Object(status)),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
