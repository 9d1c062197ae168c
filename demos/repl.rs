use std::{
    env,
    io::{self, Write},
};

use wordmatch::{VocabularyStore, analyze_many};

#[tokio::main]
async fn main() -> io::Result<()> {
    let words_path = env::args().nth(1).unwrap_or_else(|| "words.txt".into());

    let store = VocabularyStore::load(&words_path).await;

    println!(
        "wordmatch REPL - word list: {} ({} words)\n:type text, :q to quit",
        words_path,
        store.len()
    );
    let mut input = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        if input.trim() == ":q" {
            break;
        }

        let tokens: Vec<String> = input.split_whitespace().map(str::to_owned).collect();
        let results = analyze_many(&tokens, &store.words());
        for (token, result) in tokens.iter().zip(results) {
            println!(
                "  {}  ->  value: {}, lexical: {}",
                token,
                result.value.as_deref().unwrap_or("-"),
                result.lexical.as_deref().unwrap_or("-")
            );
        }

        for token in &tokens {
            match store.append(token).await {
                Ok(true) => println!("  learned {token}"),
                Ok(false) => {}
                Err(e) => eprintln!("  {e}"),
            }
        }
    }
    Ok(())
}
