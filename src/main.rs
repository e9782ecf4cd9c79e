//! Word Duel Server
//!
//! Demo binary: builds a dictionary index, then plays a complete duel
//! through the match registry with the mock proof oracle and prints the
//! resulting move ledger.

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use word_duel::{
    evaluate, CircuitInputs, DictionaryTree, MatchRegistry, MemoryLedger, MockProofOracle,
    PlayerId, PrivateInputs, ProofOracle, Secret, SessionConfig, DEFAULT_TREE_DEPTH,
    VERSION,
};

/// Built-in dictionary used when no word list file is given.
const DEMO_WORDS: &[&str] = &[
    "apple", "peach", "grape", "lemon", "mango", "melon", "berry", "olive", "crane", "slate",
    "trace", "adieu", "audio", "hello", "world", "house", "mouse", "light", "night", "plant",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Word Duel Server v{}", VERSION);

    // Dictionary: word list file from the command line, or the built-in set
    let words: Vec<String> = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading dictionary from {}", path);
            std::fs::read_to_string(&path)?
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        }
        None => DEMO_WORDS.iter().map(|w| w.to_string()).collect(),
    };

    let tree = DictionaryTree::build(&words, DEFAULT_TREE_DEPTH)?;
    info!(
        "Dictionary index: {} words, depth {}, root {}",
        tree.len(),
        tree.depth(),
        hex::encode(tree.root())
    );

    demo_match(&tree).await?;
    Ok(())
}

/// Play one complete duel: alice (secret "apple") hunts bob's "peach".
async fn demo_match(tree: &DictionaryTree) -> anyhow::Result<()> {
    info!("=== Starting Demo Duel ===");

    let oracle = Arc::new(MockProofOracle::new());
    let ledger = Arc::new(MemoryLedger::new());
    let registry = MatchRegistry::new(SessionConfig::default(), oracle.clone(), ledger);

    let match_id = registry.create_match(tree.root()).await;
    info!("Match ID: {}", hex::encode(match_id));

    let alice = PlayerId::random();
    let bob = PlayerId::random();
    let alice_secret = Secret::new("apple")?;
    let bob_secret = Secret::new("peach")?;

    registry.join(match_id, alice, alice_secret.commitment()).await?;
    registry.join(match_id, bob, bob_secret.commitment()).await?;

    // Alice works toward bob's word; bob opens with a miss
    let script = [
        (alice, &bob_secret, bob, "crane"),
        (bob, &alice_secret, alice, "slate"),
        (alice, &bob_secret, bob, "peach"),
    ];

    for (guesser, target_secret, verifier, word) in script {
        let proof = tree.prove_word(word)?;
        registry.submit_guess(match_id, guesser, word, &proof).await?;

        // The secret holder classifies locally and proves it
        let guess_codes = word_duel::word_to_letter_codes(word)?;
        let score = evaluate(&guess_codes, target_secret.letter_codes());
        let inputs = CircuitInputs::new(&target_secret.commitment(), &guess_codes, &score);
        let artifact = oracle.prove(&PrivateInputs::from(target_secret), &inputs)?;

        registry
            .submit_verification(match_id, verifier, artifact, score)
            .await?;

        let handle = registry.get_match(&match_id).await.expect("match exists");
        let state = handle.read().await;
        if let Some(winner) = state.winner() {
            info!(
                "Winner: {} after {} guesses",
                hex::encode(&winner.0[..4]),
                state.guesser_attempts()
            );
        }
    }

    info!("=== Move Ledger ===");
    for record in registry.ledger_log(match_id) {
        info!("#{} {}", record.seq, serde_json::to_string(&record.event)?);
    }

    Ok(())
}
