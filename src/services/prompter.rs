//! 操作员交互 - 业务能力层
//!
//! 缓存里没有答案的字段通过这里向操作员询问一次；
//! 人机验证等需要人工处理的情况也在这里阻塞等待。

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::{AppError, AppResult};

/// 操作员交互接口
pub trait Prompter {
    /// 自由文本（文本框、多行文本、下拉框以外的输入）
    fn ask_text(&mut self, label: &str) -> AppResult<String>;

    /// 是否勾选某个复选框
    fn ask_yes_no(&mut self, label: &str) -> AppResult<bool>;

    /// 从选项中选一个，返回下标
    fn ask_choice(&mut self, label: &str, options: &[String]) -> AppResult<usize>;

    /// 上传文件的路径
    fn ask_file(&mut self, label: &str) -> AppResult<String>;

    /// 阻塞直到操作员处理完人工步骤
    fn pause_for_manual(&mut self, reason: &str) -> AppResult<()>;
}

/// 控制台交互
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> AppResult<String> {
        write!(self.output, "{}", question).map_err(prompt_error)?;
        self.output.flush().map_err(prompt_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(prompt_error)?;
        if read == 0 {
            return Err(AppError::Prompt("输入已关闭".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.output, "{}", text).map_err(prompt_error)
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask_text(&mut self, label: &str) -> AppResult<String> {
        self.ask(&format!("Please provide the answer for '{}': ", label))
    }

    fn ask_yes_no(&mut self, label: &str) -> AppResult<bool> {
        loop {
            let reply = self.ask(&format!(
                "Do you want to check the box for '{}'? (yes/no): ",
                label
            ))?;
            match reply.trim().to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => self.say("Please answer yes or no.")?,
            }
        }
    }

    fn ask_choice(&mut self, label: &str, options: &[String]) -> AppResult<usize> {
        if options.is_empty() {
            return Err(AppError::Prompt(format!("'{}' 没有可选项", label)));
        }
        loop {
            self.say(&format!("Please select an option for '{}':", label))?;
            for (i, option) in options.iter().enumerate() {
                self.say(&format!("{}. {}", i + 1, option))?;
            }
            let reply = self.ask("Enter the number of your choice: ")?;
            match reply.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say("Invalid input, please try again.")?,
            }
        }
    }

    fn ask_file(&mut self, label: &str) -> AppResult<String> {
        self.ask(&format!("Please provide the file location for '{}': ", label))
    }

    fn pause_for_manual(&mut self, reason: &str) -> AppResult<()> {
        self.ask(&format!(
            "{} Please resolve it manually in the browser and then press Enter to continue...",
            reason
        ))?;
        Ok(())
    }
}

fn prompt_error(err: std::io::Error) -> AppError {
    AppError::Prompt(err.to_string())
}

/// 预设答案的交互实现，用于无人值守的测试
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    replies: VecDeque<String>,
    /// 被询问过的标签，按顺序
    pub asked: Vec<String>,
    /// 人工暂停次数
    pub pauses: usize,
}

impl ScriptedPrompter {
    pub fn new<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            pauses: 0,
        }
    }

    fn next(&mut self, label: &str) -> AppResult<String> {
        self.asked.push(label.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| AppError::Prompt(format!("没有为 '{}' 预设答案", label)))
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_text(&mut self, label: &str) -> AppResult<String> {
        self.next(label)
    }

    fn ask_yes_no(&mut self, label: &str) -> AppResult<bool> {
        let reply = self.next(label)?;
        Ok(matches!(reply.to_lowercase().as_str(), "yes" | "y" | "true"))
    }

    fn ask_choice(&mut self, label: &str, options: &[String]) -> AppResult<usize> {
        let reply = self.next(label)?;
        options
            .iter()
            .position(|option| option.eq_ignore_ascii_case(&reply))
            .or_else(|| reply.parse::<usize>().ok().and_then(|n| n.checked_sub(1)))
            .filter(|index| *index < options.len())
            .ok_or_else(|| AppError::Prompt(format!("'{}' 不是有效选项", reply)))
    }

    fn ask_file(&mut self, label: &str) -> AppResult<String> {
        self.next(label)
    }

    fn pause_for_manual(&mut self, _reason: &str) -> AppResult<()> {
        self.pauses += 1;
        Ok(())
    }
}
