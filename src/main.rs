use anyhow::Result;
use std::io::Write;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use eduman_quiz::clients::{build_provider, GenerationOptions, TextProvider};
use eduman_quiz::models::{Difficulty, Grade, Subject, BOARD_CHOICES};
use eduman_quiz::utils::logging;
use eduman_quiz::{
    AnswerLetter, AnswerOutcome, Config, GameSession, QuestionFlow, QuestionMode, QuestionSource,
    QuizParameters,
};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config)?;
    logging::log_startup(&config);

    let source = QuestionSource::new(
        build_provider(&config),
        GenerationOptions::from_config(&config),
    );
    let mode = QuestionMode::from_config(&config);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut session = GameSession::new();

    println!("🎮 EduMan - An AI Powered Educational Game\n");

    loop {
        let Some(params) = select_parameters(&mut input).await? else {
            break;
        };
        info!("🎯 开始新的一局 {}", params);
        session.begin(params.clone())?;

        play(&source, params, mode, &mut session, &mut input).await?;

        let score = session.score();
        logging::print_final_stats(score.correct, score.wrong, score.timed_out);
        println!("\n📊 {}\n", score);

        match read_line(&mut input, "Play again? [y/N] ").await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    println!("👋 Bye!");
    Ok(())
}

/// 游戏选择界面，输入结束（EOF）时返回 `None`
async fn select_parameters(input: &mut Input) -> Result<Option<QuizParameters>> {
    println!("🎮 Game Selector");

    loop {
        let Some(grade) = read_choice(input, "Class", &Grade::ALL.map(Grade::name)).await? else {
            return Ok(None);
        };
        let Some(mut board) = read_choice(input, "Board", &BOARD_CHOICES).await? else {
            return Ok(None);
        };
        if board.trim().eq_ignore_ascii_case("other") {
            let Some(custom) = read_line(input, "Enter Board Name: ").await? else {
                return Ok(None);
            };
            board = custom;
        }
        let Some(subject) = read_choice(input, "Subject", &Subject::ALL.map(Subject::name)).await?
        else {
            return Ok(None);
        };
        let Some(lesson) = read_line(input, "Lesson (Optional): ").await? else {
            return Ok(None);
        };
        let Some(difficulty) =
            read_choice(input, "Difficulty", &Difficulty::ALL.map(Difficulty::name)).await?
        else {
            return Ok(None);
        };

        match QuizParameters::parse(&grade, &board, &subject, &lesson, &difficulty) {
            Ok(params) => return Ok(Some(params)),
            Err(e) => {
                warn!("⚠️ 参数无效: {}", e);
                println!("❌ {}\n", e);
            }
        }
    }
}

/// 进行一局游戏，直到用户返回主页、批量题目用完或输入结束
async fn play<P: TextProvider>(
    source: &QuestionSource<P>,
    params: QuizParameters,
    mode: QuestionMode,
    session: &mut GameSession,
    input: &mut Input,
) -> Result<()> {
    let mut flow = QuestionFlow::new(source, params, mode);

    loop {
        println!("\n⏳ Generating question...");
        let Some(number) = flow.advance(session).await? else {
            println!("🏁 All questions answered!");
            return Ok(());
        };

        if let Some(question) = session.current_question() {
            println!("\n🧠 Question {}", number);
            if let Some(limit) = session.time_limit() {
                println!("⏳ Time Limit: {} sec", limit.as_secs());
            }
            println!("\n{}\n", question.question());
            for option in question.options() {
                println!("  {}", option);
            }
        }

        let Some(outcome) = read_answer(session, input).await? else {
            session.finish()?;
            return Ok(());
        };

        if let Some(question) = session.current_question() {
            match outcome {
                AnswerOutcome::Correct => println!("✔ Correct!"),
                AnswerOutcome::Wrong { .. } => {
                    println!("❌ Wrong! Correct Answer: {}", question.answer())
                }
                AnswerOutcome::Timeout => {
                    println!("⏳ Time's up! Correct Answer: {}", question.answer())
                }
            }
        }

        let next = read_line(input, "\n[N]ext Question / [H]ome: ").await?;
        match next {
            Some(choice) if choice.trim().eq_ignore_ascii_case("h") => {
                session.finish()?;
                return Ok(());
            }
            Some(_) => continue,
            None => {
                session.finish()?;
                return Ok(());
            }
        }
    }
}

/// 读取答案，直到输入有效字母、超时或输入结束
async fn read_answer(session: &mut GameSession, input: &mut Input) -> Result<Option<AnswerOutcome>> {
    loop {
        let now = Instant::now();
        if let Some(outcome) = session.poll_timeout(now) {
            println!();
            return Ok(Some(outcome));
        }
        let remaining = session.remaining(now).unwrap_or_default();

        print!("Choose your answer (A-D), {} sec left: ", remaining.as_secs());
        std::io::stdout().flush()?;

        // next_line 可以安全取消，超时后下一轮循环会结算为超时
        let line = match tokio::time::timeout(remaining, input.next_line()).await {
            Ok(line) => line?,
            Err(_) => continue,
        };

        let Some(text) = line else {
            return Ok(None);
        };
        match AnswerLetter::parse_input(&text) {
            Some(letter) => return Ok(Some(session.submit(letter, Instant::now())?)),
            None => println!("Please choose an option."),
        }
    }
}

async fn read_choice(input: &mut Input, label: &str, choices: &[&str]) -> Result<Option<String>> {
    read_line(input, &format!("{} [{}]: ", label, choices.join(" / "))).await
}

async fn read_line(input: &mut Input, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}
