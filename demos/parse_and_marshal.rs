//! Parse an env file with a fixed lookup and write it back out.

use std::collections::HashMap;

fn main() {
    let input = "\
# service settings
export APP_HOME=/srv/app
LOG_DIR=${APP_HOME}/logs
GREETING='hello $USER'
BANNER=\"Welcome, ${USER:-guest}!\"
WORKERS=4
";

    let ambient = HashMap::from([("USER", "deploy")]);
    let env = envfile_rs::parse_str(input, &ambient).expect("valid env file");

    for (key, value) in &env {
        println!("{key} => {value:?}");
    }

    println!();
    println!("{}", envfile_rs::marshal(&env));
}
