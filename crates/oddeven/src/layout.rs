use crate::error::ConfigError;

/// How a sequence of `len` elements is split across `participants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    len: usize,
    participants: usize,
}

impl Layout {
    pub fn new(len: usize, participants: usize) -> Result<Self, ConfigError> {
        if participants == 0 {
            return Err(ConfigError::NoParticipants);
        }
        if len % participants != 0 {
            return Err(ConfigError::Indivisible { len, participants });
        }
        Ok(Layout { len, participants })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Number of elements every participant owns.
    pub fn partition_len(&self) -> usize {
        self.len / self.participants
    }

    /// Split `data` into rank-ordered partitions of equal length.
    pub fn scatter<T>(&self, data: Vec<T>) -> Result<Vec<Vec<T>>, ConfigError> {
        if data.len() != self.len {
            return Err(ConfigError::PartitionLength {
                expected: self.len,
                actual: data.len(),
            });
        }

        let chunk = self.partition_len();
        let mut parts = Vec::with_capacity(self.participants);
        let mut rest = data.into_iter();
        for _ in 0..self.participants {
            parts.push(rest.by_ref().take(chunk).collect());
        }
        Ok(parts)
    }

    /// Concatenate partitions in ascending rank order.
    pub fn gather<T>(&self, parts: Vec<Vec<T>>) -> Result<Vec<T>, ConfigError> {
        if parts.len() != self.participants {
            return Err(ConfigError::SizeMismatch {
                expected: self.participants,
                actual: parts.len(),
            });
        }

        let chunk = self.partition_len();
        let mut out = Vec::with_capacity(self.len);
        for part in parts {
            if part.len() != chunk {
                return Err(ConfigError::PartitionLength {
                    expected: chunk,
                    actual: part.len(),
                });
            }
            out.extend(part);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_indivisible_sizes() {
        assert_eq!(
            Layout::new(10, 4),
            Err(ConfigError::Indivisible {
                len: 10,
                participants: 4
            })
        );
        assert_eq!(Layout::new(10, 0), Err(ConfigError::NoParticipants));
    }

    #[test]
    fn scatter_then_gather_keeps_order() {
        let layout = Layout::new(6, 3).unwrap();
        let parts = layout.scatter(vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(parts, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(layout.gather(parts).unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn gather_refuses_short_partition() {
        let layout = Layout::new(4, 2).unwrap();
        let err = layout.gather(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PartitionLength {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_input_is_a_valid_layout() {
        let layout = Layout::new(0, 3).unwrap();
        assert_eq!(layout.partition_len(), 0);
        assert_eq!(layout.scatter(Vec::<u8>::new()).unwrap().len(), 3);
    }
}
