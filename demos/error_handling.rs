//! Demonstrate error reporting for invalid env files.

fn main() {
    let inputs = [
        "GOOD=1\nBAD KEY=2\n",
        "MESSAGE=\"unterminated\n",
        "PATH_COPY=${PATH:?required}\n",
        "BELL=\u{7}\n",
    ];

    for input in inputs {
        match envfile_rs::parse_str(input, &()) {
            Ok(env) => println!("Parsed OK (unexpected): {env:?}"),
            Err(e) => {
                println!("{}", e.render());
                println!("  Kind: {:?}", e.kind);
                println!("  Location: line {}, column {}", e.span.line, e.span.column);
                if let Some(byte) = e.offending_byte() {
                    println!("  Byte: {byte:#04x}");
                }
                println!();
            }
        }
    }
}
