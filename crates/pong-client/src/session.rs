//! State that exists only while connected.

use pong_net::{ConnectionId, Identity, PlayerInfo, TableEvent};

/// The live connection handle and its id, our identity, and the
/// `player_info` projection. Created when a connection opens and dropped when it closes.
#[derive(Debug)]
pub struct ClientSession<C> {
    connection: C,
    connection_id: ConnectionId,
    identity: Identity,
    players: Vec<PlayerInfo>,
}

impl<C> ClientSession<C> {
    /// Session for a freshly opened connection.
    pub fn new(connection: C, connection_id: ConnectionId, identity: Identity) -> Self {
        Self {
            connection,
            connection_id,
            identity,
            players: Vec::new(),
        }
    }

    /// Identity the store assigned to this client.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Id of the connection this session was opened on.
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Whether an event stamped with `connection` belongs to this session.
    pub fn owns(&self, connection: ConnectionId) -> bool {
        self.connection_id == connection
    }

    /// Outbound handle.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Known `player_info` rows.
    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    /// Keep the `player_info` projection in step with the table.
    pub fn apply_player_info(&mut self, event: &TableEvent<PlayerInfo>) {
        match event {
            TableEvent::Insert(row) | TableEvent::Update { new: row, .. } => {
                match self
                    .players
                    .iter_mut()
                    .find(|info| info.player_id == row.player_id)
                {
                    Some(existing) => *existing = row.clone(),
                    None => self.players.push(row.clone()),
                }
            }
            TableEvent::Delete(row) => {
                self.players.retain(|info| info.player_id != row.player_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pong_net::Side;

    fn info(n: u64, side: Side) -> PlayerInfo {
        PlayerInfo {
            player_id: Identity::from_u64(n),
            side,
        }
    }

    #[test]
    fn test_player_info_projection() {
        let mut session = ClientSession::new((), ConnectionId::new(1), Identity::from_u64(1));
        session.apply_player_info(&TableEvent::Insert(info(1, Side::Left)));
        session.apply_player_info(&TableEvent::Insert(info(2, Side::Right)));
        session.apply_player_info(&TableEvent::Update {
            old: info(2, Side::Right),
            new: info(2, Side::Left),
        });
        assert_eq!(session.players(), &[info(1, Side::Left), info(2, Side::Left)]);

        session.apply_player_info(&TableEvent::Delete(info(1, Side::Left)));
        assert_eq!(session.players(), &[info(2, Side::Left)]);
        assert_eq!(session.identity(), Identity::from_u64(1));
    }

    #[test]
    fn test_duplicate_insert_does_not_duplicate() {
        let mut session = ClientSession::new((), ConnectionId::new(1), Identity::from_u64(1));
        session.apply_player_info(&TableEvent::Insert(info(1, Side::Left)));
        session.apply_player_info(&TableEvent::Insert(info(1, Side::Left)));
        assert_eq!(session.players().len(), 1);
    }

    #[test]
    fn test_owns_only_its_connection() {
        let session = ClientSession::new((), ConnectionId::new(2), Identity::from_u64(1));
        assert!(session.owns(ConnectionId::new(2)));
        assert!(!session.owns(ConnectionId::new(1)));
        assert_eq!(session.connection_id(), ConnectionId::new(2));
    }
}
