//! Menu-driven console editor for the localized text of the profile document.

use crate::schema::{self, Entry, Section, SECTIONS};
use crate::store::{ProfileStore, Revision, StoreError};
use anyhow::{anyhow, Context};
use serde_json::Value;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Edit(usize),
    Save,
    Discard,
}

impl MenuChoice {
    /// Accepts only the labels printed in the menu, so `07` or `+7` are not a save.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let number = (1..=SECTIONS.len() + 2).find(|n| n.to_string() == input)?;
        match number {
            n if (1..=SECTIONS.len()).contains(&n) => Some(MenuChoice::Edit(n - 1)),
            n if n == SECTIONS.len() + 1 => Some(MenuChoice::Save),
            n if n == SECTIONS.len() + 2 => Some(MenuChoice::Discard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    Discarded,
}

pub struct Editor<R, W>
where
    R: BufRead,
    W: Write,
{
    input: R,
    output: W,
    store: ProfileStore,
    document: Value,
    revision: Revision,
}

impl<R, W> Editor<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn open(store: ProfileStore, input: R, output: W) -> Result<Self, StoreError> {
        let (document, revision) = store.load()?;
        Ok(Editor {
            input,
            output,
            store,
            document,
            revision,
        })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn run(&mut self) -> Result<Outcome, anyhow::Error> {
        loop {
            self.print_menu()?;
            let answer = self.ask(&format!("\n请输入选择 (1-{}): ", SECTIONS.len() + 2))?;

            match MenuChoice::parse(&answer) {
                Some(MenuChoice::Edit(index)) => self.edit_section(&SECTIONS[index])?,
                Some(MenuChoice::Save) => {
                    if self.save()? {
                        writeln!(self.output, "🎉 更新完成！")?;
                        return Ok(Outcome::Saved);
                    }
                }
                Some(MenuChoice::Discard) => {
                    writeln!(self.output, "👋 退出，未保存更改")?;
                    return Ok(Outcome::Discarded);
                }
                None => writeln!(self.output, "❌ 无效选择，请重新输入")?,
            }
        }
    }

    fn print_menu(&mut self) -> Result<(), anyhow::Error> {
        writeln!(self.output, "\n请选择要更新的内容:")?;
        for (i, section) in SECTIONS.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, section.menu)?;
        }
        writeln!(self.output, "{}. 保存并退出", SECTIONS.len() + 1)?;
        writeln!(self.output, "{}. 退出不保存", SECTIONS.len() + 2)?;
        Ok(())
    }

    pub fn edit_section(&mut self, section: &Section) -> Result<(), anyhow::Error> {
        writeln!(self.output, "\n{}", section.title)?;

        for entry in schema::plan(section, &self.document) {
            match entry {
                Entry::Heading(heading) => writeln!(self.output, "\n{}", heading)?,
                Entry::Field(prompt) => {
                    let answer =
                        self.ask(&format!("{} (当前: {}): ", prompt.label, prompt.current))?;
                    if answer.is_empty() {
                        continue;
                    }
                    if let Err(e) = schema::assign_text(&mut self.document, &prompt.path, answer)
                    {
                        writeln!(self.output, "❌ 无法更新 {}：{}", prompt.path, e)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns `false` when the operator declines to overwrite a file changed by someone else.
    fn save(&mut self) -> Result<bool, anyhow::Error> {
        let revision = match self.store.save_if_unchanged(&self.document, &self.revision) {
            Ok(revision) => revision,
            Err(e @ StoreError::Conflict { .. }) => {
                writeln!(self.output, "⚠️ {}", e)?;
                let answer = self.ask("是否覆盖? (y/N): ")?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    writeln!(self.output, "已取消保存")?;
                    return Ok(false);
                }
                self.store.save(&self.document).context("保存失败")?
            }
            Err(e) => return Err(anyhow::Error::new(e).context("保存失败")),
        };
        self.revision = revision;
        writeln!(self.output, "✅ 文件保存成功")?;
        Ok(true)
    }

    /// Reads one line without its line ending. End of input aborts the session.
    fn ask(&mut self, prompt: &str) -> Result<String, anyhow::Error> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(anyhow!("输入已结束，未保存更改"));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn editor_with(
        dir: &tempfile::TempDir,
        doc: &Value,
        input: &str,
    ) -> Editor<Cursor<Vec<u8>>, Vec<u8>> {
        let store = ProfileStore::new(dir.path().join("profile.json"));
        store.save(doc).unwrap();
        Editor::open(store, Cursor::new(input.as_bytes().to_vec()), Vec::new()).unwrap()
    }

    #[test]
    fn menu_choice_parsing() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Edit(0)));
        assert_eq!(MenuChoice::parse(" 6 "), Some(MenuChoice::Edit(5)));
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Save));
        assert_eq!(MenuChoice::parse("8"), Some(MenuChoice::Discard));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse("save"), None);
        assert_eq!(MenuChoice::parse("07"), None);
        assert_eq!(MenuChoice::parse("+7"), None);
        assert_eq!(MenuChoice::parse(" 7x"), None);
        assert_eq!(MenuChoice::parse("008"), None);
    }

    #[test]
    fn profile_edit_only_changes_answered_field() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"profile": {"name": "Alice", "nameZh": "爱丽丝", "title": "PM"}});
        // zh name, en name, ja name, zh title, en title, ja title
        let mut editor = editor_with(&dir, &doc, "1\n\nBob\n\n\n\n\n7\n");

        assert_eq!(editor.run().unwrap(), Outcome::Saved);

        let (saved, _) = ProfileStore::new(dir.path().join("profile.json")).load().unwrap();
        assert_eq!(
            saved,
            json!({"profile": {"name": "Bob", "nameZh": "爱丽丝", "title": "PM"}})
        );
    }

    #[test]
    fn prompts_show_current_value_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"profile": {"nameZh": "爱丽丝"}});
        let mut editor = editor_with(&dir, &doc, "1\n\n\n\n\n\n\n8\n");

        editor.run().unwrap();

        let output = String::from_utf8(editor.output.clone()).unwrap();
        assert!(output.contains("📝 更新个人信息"));
        assert!(output.contains("请输入中文姓名 (当前: 爱丽丝): "));
        assert!(output.contains("请输入英文职位 (当前: ): "));
    }

    #[test]
    fn invalid_choice_reprompts_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"profile": {"name": "Alice"}});
        let mut editor = editor_with(&dir, &doc, "abc\n42\n8\n");

        assert_eq!(editor.run().unwrap(), Outcome::Discarded);

        let output = String::from_utf8(editor.output.clone()).unwrap();
        assert_eq!(output.matches("❌ 无效选择，请重新输入").count(), 2);
        assert_eq!(editor.document(), &doc);
    }

    #[test]
    fn discard_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"profile": {"name": "Alice"}});
        let mut editor = editor_with(&dir, &doc, "1\n\nBob\n\n\n\n\n8\n");
        let before = std::fs::read(dir.path().join("profile.json")).unwrap();

        assert_eq!(editor.run().unwrap(), Outcome::Discarded);

        assert_eq!(editor.document()["profile"]["name"], "Bob");
        assert_eq!(std::fs::read(dir.path().join("profile.json")).unwrap(), before);
    }

    #[test]
    fn end_of_input_aborts_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"profile": {"name": "Alice"}});
        let mut editor = editor_with(&dir, &doc, "1\n\nBob\n");

        let err = editor.run().unwrap_err();

        assert!(err.to_string().contains("输入已结束"));
        let (saved, _) = ProfileStore::new(dir.path().join("profile.json")).load().unwrap();
        assert_eq!(saved, doc);
    }

    #[test]
    fn crlf_answers_are_trimmed_of_line_ending_only() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"profile": {}});
        let mut editor = editor_with(&dir, &doc, "1\r\n\r\n Bob \r\n\r\n\r\n\r\n\r\n8\r\n");

        editor.run().unwrap();

        assert_eq!(editor.document(), &json!({"profile": {"name": " Bob "}}));
    }

    #[test]
    fn conflict_can_be_declined_then_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let doc = json!({"profile": {"name": "Alice"}});
        let mut editor = editor_with(&dir, &doc, "7\nn\n7\ny\n");

        ProfileStore::new(&path)
            .save(&json!({"profile": {"name": "Carol"}}))
            .unwrap();

        assert_eq!(editor.run().unwrap(), Outcome::Saved);

        let output = String::from_utf8(editor.output.clone()).unwrap();
        assert!(output.contains("已取消保存"));
        assert_eq!(output.matches("是否覆盖? (y/N): ").count(), 2);
        assert_eq!(ProfileStore::new(&path).load().unwrap().0, doc);
    }

    #[test]
    fn unwritable_intermediate_is_reported_and_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"skills": {"dataAI": "legacy"}});
        let mut input = String::from("4\n");
        // productPlanning and interactionDesign: 3 fields x 3 locales each
        input.push_str(&"\n".repeat(18));
        input.push_str("数据\n");
        input.push_str(&"\n".repeat(8));
        input.push_str("8\n");
        let mut editor = editor_with(&dir, &doc, &input);

        assert_eq!(editor.run().unwrap(), Outcome::Discarded);

        let output = String::from_utf8(editor.output.clone()).unwrap();
        assert!(output.contains("❌ 无法更新 skills.dataAI.name.zh：skills.dataAI 不是对象"));
        assert_eq!(editor.document(), &doc);
    }
}
