use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

fn run_command<const N: usize>(command: &str, args: [&str; N]) -> Option<String> {
    let output = Command::new(command).args(args).output().ok()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        println!("cargo:warning=Execution of {command} failed: {}", stderr.trim());
        return None;
    }
    let output = String::from_utf8(output.stdout).ok()?;
    Some(output.trim().to_string()).filter(|output| !output.is_empty())
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace(':', "\\:").replace('=', "\\=")
}

fn main() {
    let properties = [
        ("git.commit.id.abbrev", run_command("git", ["rev-parse", "--short", "HEAD"])),
        ("git.commit.time", run_command("git", ["log", "-1", "--format=%cI"])),
        ("git.branch", run_command("git", ["rev-parse", "--abbrev-ref", "HEAD"])),
    ];
    let mut contents = String::from("# Generated at build time\n");
    for (key, value) in properties {
        if let Some(value) = value {
            contents.push_str(&format!("{key}={}\n", escape(&value)));
        }
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    fs::write(out_dir.join("git.properties"), contents).expect("failed to write git.properties");

    if Path::new("../.git").exists() {
        println!("cargo:rerun-if-changed=../.git/HEAD");
        println!("cargo:rerun-if-changed=../.git/refs/heads");
    } else {
        println!("cargo:rerun-if-changed=build.rs");
    }
}
