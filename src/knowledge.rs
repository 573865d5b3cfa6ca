//! Static knowledge base of blockchain concepts

use serde::Serialize;

/// A named domain topic used for explanations and concept documents
#[derive(Debug, Clone, Serialize)]
pub struct Concept {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
    /// Column names associated with the concept, in match-priority order
    pub attributes: &'static [&'static str],
    pub examples: &'static [&'static str],
    /// Longer text used for the retrieval corpus
    pub document: &'static str,
}

const CONCEPTS: &[Concept] = &[
    Concept {
        name: "block",
        keywords: &["block", "blocks", "blockchain", "chain"],
        description: "A block in a blockchain contains a collection of transactions that have been validated and recorded.",
        attributes: &["index", "timestamp", "hash", "nonce", "previous_hash"],
        examples: &["What is in block 5?", "Show me block 10", "Tell me about block 3"],
        document: "A block in a blockchain contains a collection of transactions that have been validated and recorded. Each block has an index, timestamp, hash, nonce, and links to the previous block.",
    },
    Concept {
        name: "transaction",
        keywords: &["transaction", "transactions", "tx", "transfer", "send", "receive"],
        description: "A transaction represents the transfer of value or data between parties in the blockchain.",
        attributes: &["sender", "receiver", "amount", "transaction_id", "timestamp"],
        examples: &[
            "Show me transactions",
            "What are the recent transactions?",
            "List all transactions",
        ],
        document: "A transaction represents the transfer of value or data between parties in the blockchain. Each transaction has a sender, receiver, amount, and unique transaction ID.",
    },
    Concept {
        name: "amount",
        keywords: &["amount", "value", "money", "cost", "price", "sum", "total"],
        description: "The amount represents the value being transferred in a transaction.",
        attributes: &["amount"],
        examples: &[
            "What is the amount in block 1?",
            "Show me the total amount",
            "What's the highest amount?",
        ],
        document: "The amount represents the value being transferred in a transaction. Amounts are summed per block to give its total volume.",
    },
    Concept {
        name: "sender",
        keywords: &["sender", "from", "source", "originator"],
        description: "The sender is the party initiating the transfer of value or data.",
        attributes: &["sender"],
        examples: &[
            "Who is the sender of block 2?",
            "Show me all senders",
            "List unique senders",
        ],
        document: "The sender is the party initiating the transfer of value or data. Every transaction names exactly one sender address.",
    },
    Concept {
        name: "receiver",
        keywords: &["receiver", "to", "destination", "recipient"],
        description: "The receiver is the party that receives the value or data.",
        attributes: &["receiver"],
        examples: &[
            "Who is the receiver of block 3?",
            "Show me all receivers",
            "List unique receivers",
        ],
        document: "The receiver is the party that receives the value or data. Every transaction names exactly one receiver address.",
    },
    Concept {
        name: "hash",
        keywords: &["hash", "hash_value", "block_hash", "transaction_hash"],
        description: "A hash is a fixed-length string that uniquely represents the data in a block.",
        attributes: &["hash"],
        examples: &[
            "What is the hash of block 1?",
            "Show me block hashes",
            "Explain hash values",
        ],
        document: "A hash is a fixed-length string that uniquely represents the data in a block. It is generated using cryptographic hash functions and ensures data integrity.",
    },
    Concept {
        name: "nonce",
        keywords: &["nonce", "number", "counter"],
        description: "A nonce is a number used once in cryptographic communications to ensure uniqueness.",
        attributes: &["nonce"],
        examples: &[
            "What is the nonce of block 2?",
            "Show me nonce values",
            "Explain nonce",
        ],
        document: "A nonce is a number used once in cryptographic communications to ensure uniqueness. In blockchain, it is used in the mining process to find valid block hashes.",
    },
];

/// Suggested questions attached to rule-based responses
pub const QUERY_SUGGESTIONS: &[&str] = &[
    "What is in block 1?",
    "Who is the sender of block 2?",
    "What is the total amount?",
    "Explain what a hash is",
    "Show me recent transactions",
    "What is the nonce of block 3?",
];

/// Suggested questions attached to retrieval-pipeline responses
pub const RETRIEVAL_SUGGESTIONS: &[&str] = &[
    "What is in block 1?",
    "Who is the sender of block 2?",
    "What is the total amount in block 3?",
    "Explain what a hash is",
    "Show me recent transactions",
    "What is the nonce of block 5?",
];

pub fn suggestions() -> Vec<String> {
    QUERY_SUGGESTIONS.iter().map(ToString::to_string).collect()
}

pub fn retrieval_suggestions() -> Vec<String> {
    RETRIEVAL_SUGGESTIONS.iter().map(ToString::to_string).collect()
}

/// Ordered, immutable set of concepts
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    concepts: &'static [Concept],
}

impl KnowledgeBase {
    /// The built-in blockchain concepts
    pub fn builtin() -> Self {
        Self { concepts: CONCEPTS }
    }

    /// Concepts in definition order; matching relies on this order
    pub fn concepts(&self) -> &[Concept] {
        self.concepts
    }

    pub fn get(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.name == name)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
