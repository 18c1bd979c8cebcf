use std::env;

// Provider keys found in .env at build time are embedded so release binaries
// work without a runtime environment; runtime variables still take precedence.
const EMBEDDED_KEYS: [&str; 4] = [
    "GOOGLE_API_KEY",
    "OPENAI_API_KEY",
    "DEEPGRAM_API_KEY",
    "HUGGINGFACE_API_KEY",
];

fn main() {
    println!("cargo:rerun-if-changed=.env");
    for key in EMBEDDED_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=No .env file loaded ({}). Using system environment variables.", e);
    }

    for key in EMBEDDED_KEYS {
        match env::var(key) {
            Ok(value) if !value.is_empty() => {
                println!("cargo:rustc-env={}={}", key, value);
                println!("cargo:warning=Embedded {} (length: {})", key, value.len());
            }
            _ => {}
        }
    }
}
