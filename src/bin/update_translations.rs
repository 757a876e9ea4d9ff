use dashboard_profile::editor::Editor;
use dashboard_profile::store::{ProfileStore, PROFILE_PATH};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("🌐 多语言词条更新工具");
    println!("{}", "=".repeat(40));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut editor = match Editor::open(ProfileStore::new(PROFILE_PATH), stdin.lock(), stdout.lock()) {
        Ok(editor) => editor,
        Err(e) => {
            println!("❌ 错误：{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("✅ 成功加载 profile.json");

    match editor.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
