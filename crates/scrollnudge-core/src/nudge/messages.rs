use crate::error::ConfigError;

/// Fixed pool of nudge messages, handed out strictly round-robin.
#[derive(Debug, Clone)]
pub struct MessagePool {
    messages: Vec<String>,
    next: usize,
}

impl MessagePool {
    pub fn new(messages: Vec<String>) -> Result<Self, ConfigError> {
        if messages.is_empty() {
            return Err(ConfigError::EmptyMessagePool);
        }
        Ok(Self { messages, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Index the next call to [`MessagePool::take_next`] will return.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Return the current message and its index, then advance with
    /// wraparound.
    pub fn take_next(&mut self) -> (usize, &str) {
        let index = self.next;
        self.next = (self.next + 1) % self.messages.len();
        (index, &self.messages[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around_in_order() {
        let mut pool = MessagePool::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let taken: Vec<usize> = (0..5).map(|_| pool.take_next().0).collect();
        assert_eq!(taken, vec![0, 1, 2, 0, 1]);
        assert_eq!(pool.next_index(), 2);
    }

    #[test]
    fn single_message_repeats() {
        let mut pool = MessagePool::new(vec!["only".into()]).unwrap();
        assert_eq!(pool.take_next(), (0, "only"));
        assert_eq!(pool.take_next(), (0, "only"));
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(matches!(
            MessagePool::new(Vec::new()),
            Err(ConfigError::EmptyMessagePool)
        ));
    }
}
