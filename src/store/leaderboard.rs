use rusqlite::{params, Connection};

use crate::model::{LeaderboardRow, UserScore};

/// Write each user's scaled score, overwriting the previous value.
pub(crate) fn upsert_leaderboard_impl(
    conn: &Connection,
    users: &[UserScore],
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO leaderboard(user_id, total_score) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET total_score = excluded.total_score",
    )?;
    let mut written = 0;
    for user in users {
        written += stmt.execute(params![user.user_id, user.scaled_score])?;
    }
    Ok(written)
}

/// Leaderboard by score descending, user_id ascending on ties.
pub(crate) fn fetch_leaderboard_impl(conn: &Connection) -> rusqlite::Result<Vec<LeaderboardRow>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, total_score FROM leaderboard ORDER BY total_score DESC, user_id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LeaderboardRow {
            user_id: row.get(0)?,
            score: row.get(1)?,
        })
    })?;

    let mut board = Vec::new();
    for r in rows {
        board.push(r?);
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::init_schema_impl;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_impl(&conn).unwrap();
        conn
    }

    fn user(id: &str, scaled: f64) -> UserScore {
        UserScore {
            user_id: id.to_string(),
            total_score: scaled * 2.0,
            scaled_score: scaled,
        }
    }

    #[test]
    fn test_upsert_overwrites() {
        let conn = conn();
        upsert_leaderboard_impl(&conn, &[user("alice", 10.0)]).unwrap();
        upsert_leaderboard_impl(&conn, &[user("alice", 3.5)]).unwrap();

        let board = fetch_leaderboard_impl(&conn).unwrap();
        assert_eq!(
            board,
            vec![LeaderboardRow {
                user_id: "alice".to_string(),
                score: 3.5
            }]
        );
    }

    #[test]
    fn test_order_descending_with_user_tiebreak() {
        let conn = conn();
        upsert_leaderboard_impl(
            &conn,
            &[user("carol", 5.0), user("bob", 9.0), user("alice", 5.0)],
        )
        .unwrap();

        let board = fetch_leaderboard_impl(&conn).unwrap();
        let order: Vec<_> = board.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(order, vec!["bob", "alice", "carol"]);
    }

    #[test]
    fn test_stores_scaled_not_raw() {
        let conn = conn();
        upsert_leaderboard_impl(&conn, &[user("alice", 9.0)]).unwrap();
        assert_eq!(fetch_leaderboard_impl(&conn).unwrap()[0].score, 9.0);
    }
}
